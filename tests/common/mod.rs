//! Shared test doubles

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tripbot::{DecodedImage, GenerativeModel, ModelGateway, SectionRouter};

/// Records every call and answers with a canned reply or error
#[derive(Default)]
pub struct MockModel {
    pub text_calls: AtomicUsize,
    pub vision_calls: AtomicUsize,
    pub prompts: Mutex<Vec<(String, String)>>,
    pub fail_with: Option<String>,
}

impl MockModel {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn vision_calls(&self) -> usize {
        self.vision_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.text_calls() + self.vision_calls()
    }

    fn reply(&self, answer: String) -> Result<String> {
        match &self.fail_with {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(answer),
        }
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate_text(&self, prompt: &str, text: &str) -> Result<String> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), text.to_string()));
        self.reply(format!("text answer for: {prompt}"))
    }

    async fn generate_vision(&self, prompt: &str, image: &DecodedImage) -> Result<String> {
        self.vision_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), image.mime_type.to_string()));
        self.reply(format!(
            "vision answer for a {}x{} picture",
            image.width, image.height
        ))
    }
}

pub fn router_with(model: Arc<MockModel>) -> SectionRouter {
    SectionRouter::new(ModelGateway::new(model))
}

pub fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbImage::new(4, 3)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
