//! Gemini `generateContent` client
//!
//! Sends the prompt plus either user text or an inline image to the
//! Google generative language API and returns the first candidate's text.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{DecodedImage, GenerativeModel};
use crate::config::GeminiConfig;
use crate::TripBotError;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini API client holding the credential for every call
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    base_url: String,
    text_model: String,
    vision_model: String,
    http: Client,
}

impl GeminiClient {
    /// Create a client from configuration
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TripBot/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
            http,
        })
    }

    fn endpoint(&self, model: &str) -> Result<Url> {
        let model = model.strip_prefix("models/").unwrap_or(model);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        Url::parse(&url).context("invalid Gemini endpoint URL")
    }

    /// Call `generateContent` on `model` and return the answer text
    #[instrument(name = "gemini_generate", skip(self, req))]
    pub async fn generate_content(
        &self,
        model: &str,
        req: &GenerateContentRequest,
    ) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            TripBotError::remote(
                "Gemini API key is not configured. Set GOOGLE_API_KEY or TRIPBOT_GEMINI__API_KEY.",
            )
        })?;
        let url = self.endpoint(model)?;

        debug!("Sending generateContent request");
        // Key goes in a header, never the URL.
        let resp = self
            .http
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                TripBotError::remote(format!("request to Gemini API failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(TripBotError::remote(format!("Gemini API error: {status} - {detail}")).into());
        }

        let data = resp
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                TripBotError::remote(format!(
                    "invalid response JSON from Gemini API: {}",
                    e.without_url()
                ))
            })?;

        data.answer_text()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_text(&self, prompt: &str, text: &str) -> Result<String> {
        let mut parts = vec![Part::text(prompt)];
        if !text.trim().is_empty() {
            parts.push(Part::text(text));
        }
        let req = GenerateContentRequest::single(parts);
        self.generate_content(&self.text_model, &req).await
    }

    async fn generate_vision(&self, prompt: &str, image: &DecodedImage) -> Result<String> {
        let parts = vec![Part::text(prompt), Part::image(image)];
        let req = GenerateContentRequest::single(parts);
        self.generate_content(&self.vision_model, &req).await
    }
}

// Request/Response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "generationConfig")]
    pub generation_config: Option<Value>,
}

impl GenerateContentRequest {
    /// One user turn made of `parts`
    pub fn single(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, all text parts joined
    pub fn answer_text(&self) -> Result<String> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.clone())
                .map(|reason| format!(" (blocked: {reason})"))
                .unwrap_or_default();
            return Err(TripBotError::remote(format!("Gemini returned no candidates{reason}")).into());
        };

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| content.parts.iter().filter_map(Part::as_text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
            return Err(TripBotError::remote(format!(
                "Gemini returned an empty answer (finish reason: {reason})"
            ))
            .into());
        }
        Ok(text)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn image(image: &DecodedImage) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type.to_string(),
                data: BASE64.encode(&image.bytes),
            },
        }
    }

    /// Get the text content if this is a Text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        }
    }
}

/// Base64 payload with its MIME type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
