//! `TripBot` - smarter planning for better journeys
//!
//! This library turns a travel section (location finder, trip planner,
//! budget planner, transport guide, restaurant and hotel planner) plus the
//! user's form input into a Gemini prompt, and returns the model's answer
//! together with the section's booking links.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod router;
pub mod web;

// Re-export core types for public API
pub use config::TripBotConfig;
pub use error::TripBotError;
pub use gateway::{DecodedImage, GeminiClient, GenerativeModel, ModelGateway, ModelResult};
pub use models::{AuxLink, AuxiliaryLinks, ImageUpload, SectionId, UserInput};
pub use prompt::{PromptRequest, PromptTemplateSet};
pub use router::{SectionResponse, SectionRouter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripBotError>;
