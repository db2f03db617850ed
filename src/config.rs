//! Configuration management for the `TripBot` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TripBotError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Conventional environment variable for the Gemini key, read when no TripBot key is set
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Root configuration structure for the `TripBot` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TripBotConfig {
    /// Gemini API configuration
    pub gemini: GeminiConfig,
    /// Web server configuration
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Gemini API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Gemini API key
    pub api_key: Option<String>,
    /// Base URL for the generative language API
    pub base_url: String,
    /// Model used for text prompts
    pub text_model: String,
    /// Model used for image prompts
    pub vision_model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Web server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted upload size in MB
    pub max_upload_mb: u32,
    /// PEM certificate chain, enables HTTPS together with `tls_key`
    pub tls_cert: Option<PathBuf>,
    /// PEM private key
    pub tls_key: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_vision_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_timeout() -> u32 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload_mb() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            text_model: default_text_model(),
            vision_model: default_vision_model(),
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ServerConfig {
    /// Upload limit in bytes
    #[must_use]
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

impl TripBotConfig {
    /// Load configuration from file and environment variables
    ///
    /// An explicit `config_path` must exist; the default location is optional.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        // A missing .env file is the normal case outside development.
        let _ = dotenvy::dotenv();

        let mut builder = Config::builder();

        match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(TripBotError::config(format!(
                        "Configuration file {} does not exist",
                        path.display()
                    ))
                    .into());
                }
                builder = builder.add_source(
                    File::from(path)
                        .required(true)
                        .format(config::FileFormat::Toml),
                );
            }
            None => {
                let default_file = Self::get_config_path()
                    .unwrap_or_else(|| PathBuf::from("config.toml"));
                if default_file.exists() {
                    builder = builder.add_source(
                        File::from(default_file)
                            .required(false)
                            .format(config::FileFormat::Toml),
                    );
                }
            }
        }

        // Environment overrides, e.g. TRIPBOT_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("TRIPBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TripBotConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.gemini.api_key.is_none() {
            config.gemini.api_key = std::env::var(GOOGLE_API_KEY_ENV).ok();
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tripbot").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.gemini.text_model.is_empty() {
            self.gemini.text_model = default_text_model();
        }
        if self.gemini.vision_model.is_empty() {
            self.gemini.vision_model = default_vision_model();
        }
        if self.gemini.timeout_seconds == 0 {
            self.gemini.timeout_seconds = default_gemini_timeout();
        }
        if self.gemini.api_key.as_deref().is_some_and(|key| key.trim().is_empty()) {
            self.gemini.api_key = None;
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.max_upload_mb == 0 {
            self.server.max_upload_mb = default_max_upload_mb();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    ///
    /// A missing key is allowed: the server still starts and every answer
    /// reports that the key is not configured.
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.gemini.api_key {
            if api_key.len() < 8 {
                return Err(TripBotError::config(
                    "Gemini API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 200 {
                return Err(TripBotError::config(
                    "Gemini API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }

            if api_key.chars().any(char::is_whitespace) {
                return Err(
                    TripBotError::config("Gemini API key must not contain whitespace").into(),
                );
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.gemini.timeout_seconds > 600 {
            return Err(
                TripBotError::config("Gemini API timeout cannot exceed 600 seconds").into(),
            );
        }

        if self.server.max_upload_mb > 100 {
            return Err(TripBotError::config("Upload limit cannot exceed 100 MB").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TripBotError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TripBotError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.gemini.base_url.starts_with("http://")
            && !self.gemini.base_url.starts_with("https://")
        {
            return Err(TripBotError::config(
                "Gemini API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            return Err(TripBotError::config(
                "Both server.tls_cert and server.tls_key must be set to enable HTTPS",
            )
            .into());
        }

        Ok(())
    }
}
