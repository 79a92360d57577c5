//! Upstream request types
//!
//! These types are backend-agnostic and used across all AI implementations.

use base64::Engine;

/// A single text-generation call: one system message, one user message
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    /// Model identifier as understood by the upstream service
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Optional image sent alongside the user prompt (receipt analysis)
    pub image: Option<ImageAttachment>,
}

impl TextRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 150,
            image: None,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Decoded image bytes plus the MIME type they were declared with
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// Default MIME type when the client sends bare base64
    pub const DEFAULT_MIME: &'static str = "image/jpeg";

    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Re-encode as a `data:` URL for multimodal chat messages
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}
