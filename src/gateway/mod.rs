//! Model gateway
//!
//! Wraps the two remote operations (text and vision completion) and
//! contains every failure as a [`ModelResult::Failure`].

use std::fmt::Display;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use image::{ImageFormat, ImageReader};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::prompt::PromptRequest;

pub mod gemini;

pub use gemini::GeminiClient;

/// An image that decoded successfully, ready to be sent to the model
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Remote generative capability
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// `generate(prompt, text) -> text`
    async fn generate_text(&self, prompt: &str, text: &str) -> Result<String>;

    /// `generate(prompt, image) -> text`
    async fn generate_vision(&self, prompt: &str, image: &DecodedImage) -> Result<String>;
}

/// Outcome of one remote generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum ModelResult {
    Success(String),
    Failure(String),
}

impl ModelResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ModelResult::Success(_))
    }

    /// Text to show the user: the answer, or `Error: ...`
    #[must_use]
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl Display for ModelResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelResult::Success(text) => write!(f, "{text}"),
            ModelResult::Failure(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// Failure-containing front for a [`GenerativeModel`]
#[derive(Clone)]
pub struct ModelGateway {
    model: Arc<dyn GenerativeModel>,
}

impl ModelGateway {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Send the instruction and free text to the text model
    #[instrument(name = "complete_text", skip_all, fields(section = %request.section))]
    pub async fn complete_text(&self, request: &PromptRequest) -> ModelResult {
        let start_time = Instant::now();
        let outcome = self
            .model
            .generate_text(&request.instruction, &request.text)
            .await;
        contain(outcome, start_time)
    }

    /// Decode the uploaded image and send it with the instruction to the vision model
    #[instrument(name = "complete_vision", skip_all, fields(section = %request.section))]
    pub async fn complete_vision(&self, request: &PromptRequest) -> ModelResult {
        let start_time = Instant::now();
        let image = match request.image.as_ref() {
            Some(upload) => decode_image(&upload.bytes),
            None => Err(anyhow!("no image supplied")),
        };
        let outcome = match image {
            Ok(image) => {
                info!(
                    "Decoded {} image {}x{}",
                    image.mime_type, image.width, image.height
                );
                self.model
                    .generate_vision(&request.instruction, &image)
                    .await
            }
            Err(e) => Err(e),
        };
        contain(outcome, start_time)
    }
}

fn contain(outcome: Result<String>, start_time: Instant) -> ModelResult {
    match outcome {
        Ok(text) => {
            info!(
                "Model answered in {:.3}s ({} chars)",
                start_time.elapsed().as_secs_f64(),
                text.len()
            );
            ModelResult::Success(text)
        }
        Err(e) => {
            let mut reason = format!("{e:#}");
            if reason.trim().is_empty() {
                reason = "unknown model error".to_string();
            }
            warn!("Model call failed: {}", reason);
            ModelResult::Failure(reason)
        }
    }
}

/// Decode the upload to make sure it is a PNG or JPEG picture
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to read image")?;
    let format = reader
        .format()
        .ok_or_else(|| anyhow!("Unrecognized image format"))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(anyhow!(
            "Unsupported image format {format:?}, upload a JPEG or PNG"
        ));
    }
    let decoded = reader.decode().context("Failed to decode image")?;

    Ok(DecodedImage {
        bytes: bytes.to_vec(),
        mime_type: format.to_mime_type(),
        width: decoded.width(),
        height: decoded.height(),
    })
}
