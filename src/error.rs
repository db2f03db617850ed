//! Error types and handling for the `TripBot` application

use thiserror::Error;

/// Main error type for the `TripBot` application
#[derive(Error, Debug)]
pub enum TripBotError {
    /// A field the selected section needs was not supplied
    #[error("Missing input: {field}")]
    InputMissing { field: String },

    /// A supplied field violates a basic domain constraint
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The generative model call failed (network, auth, quota, malformed response)
    #[error("Remote model error: {message}")]
    RemoteFailure { message: String },

    /// An internal invariant was violated, e.g. an unknown section slug
    #[error("Impossible state: {message}")]
    ImpossibleState { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripBotError {
    /// Create a new missing-input error
    pub fn input_missing<S: Into<String>>(field: S) -> Self {
        Self::InputMissing {
            field: field.into(),
        }
    }

    /// Create a new invalid-input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new remote failure
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::RemoteFailure {
            message: message.into(),
        }
    }

    /// Create a new impossible-state error
    pub fn impossible<S: Into<String>>(message: S) -> Self {
        Self::ImpossibleState {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripBotError::InputMissing { field } => {
                format!("Please provide the {field} before asking TripBot.")
            }
            TripBotError::InvalidInput { message } => {
                format!("Invalid input: {message}")
            }
            TripBotError::RemoteFailure { message } => message.clone(),
            TripBotError::ImpossibleState { .. } => {
                "Something went wrong inside TripBot. Please reload the page.".to_string()
            }
            TripBotError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TripBotError::Io { .. } => {
                "File operation failed. Please check the path and file permissions.".to_string()
            }
        }
    }
}
