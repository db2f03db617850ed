//! Data models for the TripBot application
//!
//! This module contains the request-scoped domain models organized by concern:
//! - Section: the five workflows a user can pick
//! - Input: form values collected by the presentation layer
//! - Links: static booking and discovery links attached to some sections

pub mod input;
pub mod links;
pub mod section;

// Re-export all public types for convenient access
pub use input::{ImageUpload, UserInput};
pub use links::{AuxLink, AuxiliaryLinks};
pub use section::{InputField, SectionId};
