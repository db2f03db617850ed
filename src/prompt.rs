//! Prompt templates
//!
//! Turns a section and the user's form values into the natural-language
//! instruction sent to the model. Input problems are reported here, before
//! any remote call is attempted.

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::models::{ImageUpload, SectionId, UserInput};
use crate::{Result, TripBotError};

const LOCATION_FINDER_PROMPT: &str =
    "Describe this place with its location details and attractions.";

/// Instruction plus the payload that accompanies it
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub section: SectionId,
    pub instruction: String,
    /// Free text sent alongside the instruction
    pub text: String,
    pub image: Option<ImageUpload>,
}

/// Fixed mapping from section to prompt template
pub struct PromptTemplateSet;

impl PromptTemplateSet {
    /// Build the prompt for `section`, defaulting missing dates to today
    pub fn build(section: SectionId, input: &UserInput) -> Result<PromptRequest> {
        Self::build_on(section, input, Local::now().date_naive())
    }

    /// Build the prompt for `section` with an explicit "today"
    pub fn build_on(
        section: SectionId,
        input: &UserInput,
        today: NaiveDate,
    ) -> Result<PromptRequest> {
        let destination = input.destination_text();
        if section != SectionId::LocationFinder {
            reject_control_characters(destination)?;
        }

        let request = match section {
            SectionId::LocationFinder => {
                let image = input
                    .image
                    .clone()
                    .ok_or_else(|| TripBotError::input_missing("image"))?;
                if image.bytes.is_empty() {
                    return Err(TripBotError::input_missing("image"));
                }
                PromptRequest {
                    section,
                    instruction: LOCATION_FINDER_PROMPT.to_string(),
                    text: String::new(),
                    image: Some(image),
                }
            }
            SectionId::TripPlanner => {
                let start = input.start_date.unwrap_or(today);
                let end = input.end_date.unwrap_or(today);
                if end < start {
                    // Passed through as entered; the model sees the user's dates.
                    warn!(%start, %end, "Trip end date is before start date");
                }
                text_request(
                    section,
                    format!(
                        "Provide a detailed itinerary for a trip to {destination} from {} to {}.",
                        start.format("%Y-%m-%d"),
                        end.format("%Y-%m-%d")
                    ),
                    destination,
                )
            }
            SectionId::BudgetPlanner => {
                let budget = input
                    .budget
                    .ok_or_else(|| TripBotError::input_missing("budget"))?;
                if !budget.is_finite() || budget <= 0.0 {
                    return Err(TripBotError::invalid_input(format!(
                        "budget must be a positive number, got {budget}"
                    )));
                }
                text_request(
                    section,
                    format!(
                        "Suggest a budget plan for a trip to {destination} within {} INR/USD, including accommodation, food, transport, and sightseeing.",
                        format_budget(budget)
                    ),
                    destination,
                )
            }
            SectionId::TransportGuide => text_request(
                section,
                format!(
                    "Provide travel options for reaching {destination}, including flights, trains, buses, and rental services with estimated costs."
                ),
                destination,
            ),
            SectionId::AccommodationPlanner => text_request(
                section,
                format!(
                    "Provide top restaurants and hotels in {destination} with ratings and pricing."
                ),
                destination,
            ),
        };

        debug!(section = %section, instruction = %request.instruction, "Built prompt");
        Ok(request)
    }
}

fn text_request(section: SectionId, instruction: String, text: &str) -> PromptRequest {
    PromptRequest {
        section,
        instruction,
        text: text.to_string(),
        image: None,
    }
}

/// Whole amounts print without a fractional part
fn format_budget(budget: f64) -> String {
    if budget.fract() == 0.0 && budget < 1e15 {
        format!("{budget:.0}")
    } else {
        format!("{budget}")
    }
}

/// Line breaks and tabs are fine in a trip description, other control
/// characters are not.
fn reject_control_characters(text: &str) -> Result<()> {
    if let Some(c) = text
        .chars()
        .find(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(TripBotError::invalid_input(format!(
            "text contains a control character (U+{:04X})",
            u32::from(c)
        )));
    }
    Ok(())
}
