//! Section dispatch
//!
//! Maps each section to its prompt template, the gateway operation to call,
//! and the static links attached to the answer.

use serde::Serialize;
use tracing::{info, instrument};

use crate::Result;
use crate::gateway::{ModelGateway, ModelResult};
use crate::models::{AuxiliaryLinks, SectionId, UserInput};
use crate::prompt::PromptTemplateSet;

/// Which remote operation a section uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Text,
    Vision,
}

/// Dispatch table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub completion: Completion,
    pub links: AuxiliaryLinks,
}

impl Route {
    #[must_use]
    pub fn for_section(section: SectionId) -> Self {
        let completion = match section {
            SectionId::LocationFinder => Completion::Vision,
            SectionId::TripPlanner
            | SectionId::BudgetPlanner
            | SectionId::TransportGuide
            | SectionId::AccommodationPlanner => Completion::Text,
        };
        Self {
            completion,
            links: section.links(),
        }
    }
}

/// Answer for one interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionResponse {
    pub section: SectionId,
    pub result: ModelResult,
    pub links: AuxiliaryLinks,
}

/// Stateless dispatcher from section to template and model call
#[derive(Clone)]
pub struct SectionRouter {
    gateway: ModelGateway,
}

impl SectionRouter {
    pub fn new(gateway: ModelGateway) -> Self {
        Self { gateway }
    }

    /// Build the section's prompt and run it through the gateway
    ///
    /// Missing or invalid input is returned as an error before any remote
    /// call; remote failures come back inside the response.
    #[instrument(name = "handle_section", skip_all, fields(section = %section))]
    pub async fn handle(&self, section: SectionId, input: &UserInput) -> Result<SectionResponse> {
        let request = PromptTemplateSet::build(section, input)?;
        let route = Route::for_section(section);

        let result = match route.completion {
            Completion::Text => self.gateway.complete_text(&request).await,
            Completion::Vision => self.gateway.complete_vision(&request).await,
        };

        info!(
            success = result.is_success(),
            links = route.links.len(),
            "Handled section"
        );

        Ok(SectionResponse {
            section,
            result,
            links: route.links,
        })
    }
}
