//! Advisor: one method per SavvyBee capability
//!
//! The advisor combines the upstream client, the prompt library and the
//! configured model names. Handlers and CLI commands call it after they have
//! validated their input, so every method here results in exactly one
//! upstream call.
//!
//! ```rust,ignore
//! let advisor = Advisor::from_settings(&Settings::from_env()?)?;
//! let reply = advisor.chat("Should I buy a new phone?").await?;
//! ```

use std::sync::Arc;

use base64::Engine;
use serde_json::Value;
use tracing::{debug, info};

use crate::ai::parsing::extract_or_fallback;
use crate::ai::{AIBackend, AIClient, ImageAttachment, TextRequest};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::models::{FinancialSummary, ReceiptAnalysis};
use crate::prompts::{Prompt, PromptId, PromptLibrary, TaskType};

/// Filename sent with every transcription upload (format hint for the service)
pub const TRANSCRIPTION_FILENAME: &str = "recording.webm";

/// Language hint sent with every transcription upload
pub const TRANSCRIPTION_LANGUAGE: &str = "en";

#[derive(Clone)]
pub struct Advisor {
    ai: AIClient,
    prompts: Arc<PromptLibrary>,
    chat_model: String,
    receipt_model: String,
}

impl Advisor {
    pub fn new(
        ai: AIClient,
        prompts: Arc<PromptLibrary>,
        chat_model: impl Into<String>,
        receipt_model: impl Into<String>,
    ) -> Self {
        Self {
            ai,
            prompts,
            chat_model: chat_model.into(),
            receipt_model: receipt_model.into(),
        }
    }

    /// Build the production advisor: OpenAI-compatible backend plus prompts
    /// resolved against the configured (or default) override directory
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = match &settings.prompts_dir {
            Some(dir) => PromptLibrary::with_override_dir(dir.clone())?,
            None => PromptLibrary::new()?,
        };

        Ok(Self::new(
            AIClient::from_settings(settings),
            Arc::new(prompts),
            &settings.chat.model,
            &settings.chat.receipt_model,
        ))
    }

    /// Advisor backed by a mock client and the embedded prompts
    pub fn with_client(ai: AIClient) -> Result<Self> {
        Ok(Self::new(
            ai,
            Arc::new(PromptLibrary::embedded_only()?),
            crate::config::DEFAULT_CHAT_MODEL,
            crate::config::DEFAULT_RECEIPT_MODEL,
        ))
    }

    pub fn client(&self) -> &AIClient {
        &self.ai
    }

    pub fn prompts(&self) -> &PromptLibrary {
        &self.prompts
    }

    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    pub fn receipt_model(&self) -> &str {
        &self.receipt_model
    }

    /// One chat turn: persona as system prompt, the message verbatim as user prompt
    pub async fn chat(&self, message: &str) -> Result<String> {
        let prompt = self.prompts.get(PromptId::ChatPersona)?;
        let request = self.request(prompt, prompt.system()?, message);

        let reply = self.ai.generate_text(&request).await?;
        debug!(model = %request.model, reply_len = reply.len(), "Chat reply received");
        Ok(reply)
    }

    /// Ask the vision model to describe a receipt image
    ///
    /// Always returns a JSON object: either the one found in the reply or the
    /// receipt fallback.
    pub async fn analyze_receipt(&self, image: ImageAttachment) -> Result<Value> {
        let prompt = self.prompts.get(PromptId::AnalyzeReceipt)?;
        let request = self
            .request(prompt, prompt.system()?, prompt.user()?)
            .with_image(image);

        let reply = self.ai.generate_text(&request).await?;
        debug!(model = %request.model, reply_len = reply.len(), "Receipt analysis received");
        Ok(extract_or_fallback(&reply, ReceiptAnalysis::fallback_value()))
    }

    /// Generate a monthly financial overview
    ///
    /// `user_data` is accepted for API compatibility but is not part of the
    /// prompt; every caller gets the same instruction.
    pub async fn financial_summary(&self, user_data: Option<&Value>) -> Result<Value> {
        if let Some(data) = user_data {
            debug!(fields = object_len(data), "Ignoring userData for financial summary");
        }

        let prompt = self.prompts.get(PromptId::FinancialSummary)?;
        let request = self.request(prompt, prompt.system()?, prompt.user()?);

        let reply = self.ai.generate_text(&request).await?;
        debug!(model = %request.model, reply_len = reply.len(), "Financial summary received");
        Ok(extract_or_fallback(&reply, FinancialSummary::fallback_value()))
    }

    /// Transcribe an in-memory recording
    pub async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        info!(bytes = audio.len(), "Transcribing audio");
        self.ai
            .transcribe_audio(audio, TRANSCRIPTION_FILENAME, TRANSCRIPTION_LANGUAGE)
            .await
    }

    fn request(&self, prompt: &Prompt, system: &str, user: &str) -> TextRequest {
        let model = match prompt.metadata.task_type {
            TaskType::Chat => &self.chat_model,
            TaskType::Vision => &self.receipt_model,
        };
        TextRequest::new(system, user, model)
            .with_sampling(prompt.metadata.temperature, prompt.metadata.max_tokens)
    }
}

fn object_len(value: &Value) -> usize {
    value.as_object().map(|o| o.len()).unwrap_or(0)
}

/// Decode a base64 image, optionally wrapped as a `data:<mime>;base64,` URL
pub fn decode_image_payload(payload: &str) -> Result<ImageAttachment> {
    let payload = payload.trim();

    let (mime_type, encoded) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| Error::InvalidData("Malformed data URL".into()))?;
            let mime = header.split(';').next().unwrap_or_default();
            let mime = if mime.is_empty() {
                ImageAttachment::DEFAULT_MIME
            } else {
                mime
            };
            (mime, data)
        }
        None => (ImageAttachment::DEFAULT_MIME, payload),
    };

    // MIME-style payloads wrap lines
    let encoded: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let data = base64::engine::general_purpose::STANDARD
        .decode(&encoded)
        .map_err(|e| Error::InvalidData(format!("Invalid base64: {}", e)))?;

    if data.is_empty() {
        return Err(Error::InvalidData("Image is empty".into()));
    }

    Ok(ImageAttachment::new(mime_type, data))
}
