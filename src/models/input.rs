//! Form values collected by the presentation layer

use chrono::NaiveDate;

/// Raw image as uploaded, before any decoding
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    /// Content type declared by the client, if any
    pub content_type: Option<String>,
}

impl ImageUpload {
    #[must_use]
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }
}

/// Everything the user entered for one interaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInput {
    /// Destination and free-form trip details
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Total budget in INR/USD
    pub budget: Option<f64>,
    pub image: Option<ImageUpload>,
}

impl UserInput {
    #[must_use]
    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    #[must_use]
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    #[must_use]
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Destination text, empty when the field was left blank
    #[must_use]
    pub fn destination_text(&self) -> &str {
        self.destination.as_deref().unwrap_or_default()
    }
}
