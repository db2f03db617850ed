//! Section identifiers and their presentation metadata

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TripBotError;

/// One of the five independent workflows offered in the side panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    LocationFinder,
    TripPlanner,
    BudgetPlanner,
    TransportGuide,
    AccommodationPlanner,
}

/// Form fields a section reads from the main panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Destination,
    StartDate,
    EndDate,
    Budget,
    Image,
}

impl SectionId {
    /// All sections in side panel order
    pub const ALL: [SectionId; 5] = [
        SectionId::LocationFinder,
        SectionId::TripPlanner,
        SectionId::BudgetPlanner,
        SectionId::TransportGuide,
        SectionId::AccommodationPlanner,
    ];

    /// Stable identifier used in URLs and on the command line
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            SectionId::LocationFinder => "location-finder",
            SectionId::TripPlanner => "trip-planner",
            SectionId::BudgetPlanner => "budget-planner",
            SectionId::TransportGuide => "transport-guide",
            SectionId::AccommodationPlanner => "accommodation-planner",
        }
    }

    /// Label shown in the side panel
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SectionId::LocationFinder => "Location Finder",
            SectionId::TripPlanner => "Trip Planner",
            SectionId::BudgetPlanner => "Budget Planner",
            SectionId::TransportGuide => "Transportation Guide",
            SectionId::AccommodationPlanner => "Restaurant & Hotel Planner",
        }
    }

    /// Heading printed above the model's answer
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            SectionId::LocationFinder => "Tour Bot",
            SectionId::TripPlanner => "Trip Planner",
            SectionId::BudgetPlanner => "Budget Guide",
            SectionId::TransportGuide => "Transport Guide",
            SectionId::AccommodationPlanner => "Accommodation Bot",
        }
    }

    /// Text of the section's action button
    #[must_use]
    pub fn action_label(self) -> &'static str {
        match self {
            SectionId::LocationFinder => "Find Location!",
            SectionId::TripPlanner => "Plan my Trip!",
            SectionId::BudgetPlanner => "Plan My Budget!",
            SectionId::TransportGuide => "Find Transport!",
            SectionId::AccommodationPlanner => "Find Hotels & Restaurants!",
        }
    }

    /// Fields the main panel shows for this section
    #[must_use]
    pub fn fields(self) -> &'static [InputField] {
        match self {
            SectionId::LocationFinder => &[InputField::Image],
            SectionId::TripPlanner => &[
                InputField::StartDate,
                InputField::EndDate,
                InputField::Destination,
            ],
            SectionId::BudgetPlanner => &[InputField::Budget, InputField::Destination],
            SectionId::TransportGuide | SectionId::AccommodationPlanner => {
                &[InputField::Destination]
            }
        }
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SectionId {
    type Err = TripBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|section| section.slug() == s)
            .ok_or_else(|| TripBotError::impossible(format!("unknown section '{s}'")))
    }
}
