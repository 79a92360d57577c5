//! OpenAI-compatible backend implementation
//!
//! Works with any hosted service that implements the OpenAI REST surface:
//! - Groq (https://api.groq.com/openai)
//! - OpenAI (https://api.openai.com)
//! - Self-hosted servers such as vLLM or LocalAI
//!
//! Text generation goes to `/v1/chat/completions`; transcription goes to
//! `/v1/audio/transcriptions`. The two may live on different hosts with
//! different API keys.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::{Error, Result};

use super::types::TextRequest;
use super::AIBackend;

/// Upper bound on any single upstream call
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Transcription endpoint (separate service, separate credentials)
#[derive(Clone)]
struct TranscriptionEndpoint {
    base_url: String,
    api_key: Option<String>,
    model: String,
}

/// OpenAI-compatible backend
///
/// # Example
///
/// ```rust,ignore
/// let backend = OpenAICompatibleBackend::with_api_key(
///     "https://api.groq.com/openai",
///     "llama3-70b-8192",
///     &groq_key,
/// )
/// .with_transcription("https://api.openai.com", Some(&openai_key), "whisper-1");
/// ```
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    transcription: Option<TranscriptionEndpoint>,
    timeout: Duration,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: normalize_base_url(base_url),
            model: model.to_string(),
            api_key: None,
            transcription: None,
            timeout: UPSTREAM_TIMEOUT,
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        let mut backend = Self::new(base_url, model);
        backend.api_key = Some(api_key.to_string());
        backend
    }

    /// Attach a transcription endpoint
    pub fn with_transcription(mut self, base_url: &str, api_key: Option<&str>, model: &str) -> Self {
        self.transcription = Some(TranscriptionEndpoint {
            base_url: normalize_base_url(base_url),
            api_key: api_key.map(str::to_string),
            model: model.to_string(),
        });
        self
    }

    /// Override the per-call timeout (defaults to `UPSTREAM_TIMEOUT`)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build both endpoints from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_api_key(
            &settings.chat.host,
            &settings.chat.model,
            &settings.chat.api_key,
        )
        .with_transcription(
            &settings.transcription.host,
            Some(&settings.transcription.api_key),
            &settings.transcription.model,
        )
    }

    fn authorize(builder: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
        match api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Make a chat completion request
    async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<String> {
        let req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .timeout(self.timeout)
            .json(request);

        let response = Self::authorize(req_builder, self.api_key.as_deref())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Chat completion API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Upstream("No response from chat completion API".into()))
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Build the wire request for a text-generation call
fn build_chat_request(request: &TextRequest) -> ChatCompletionRequest {
    let user_content = match &request.image {
        Some(image) => ChatContent::Parts(vec![
            ContentPart::Text {
                text: request.user_prompt.clone(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.to_data_url(),
                },
            },
        ]),
        None => ChatContent::Text(request.user_prompt.clone()),
    };

    ChatCompletionRequest {
        model: request.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: ChatContent::Text(request.system_prompt.clone()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_content,
            },
        ],
        temperature: Some(request.temperature),
        max_tokens: Some(request.max_tokens),
        stream: false,
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Chat message
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: ChatContent,
}

/// Chat message content (text or multimodal)
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Content part for multimodal messages
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

/// Image URL for vision requests
#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

/// Content is nullable in the OpenAI schema (tool calls, refusals)
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Transcription response (`response_format=json`)
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl AIBackend for OpenAICompatibleBackend {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        let wire = build_chat_request(request);

        debug!(
            model = %request.model,
            host = %self.base_url,
            has_image = request.image.is_some(),
            "Sending chat completion request"
        );

        let reply = self.chat_completion(&wire).await?;
        debug!(chars = reply.len(), "Chat completion response received");

        Ok(reply)
    }

    async fn transcribe_audio(
        &self,
        audio: &[u8],
        filename_hint: &str,
        language_hint: &str,
    ) -> Result<String> {
        let endpoint = self
            .transcription
            .as_ref()
            .ok_or_else(|| Error::Config("Transcription endpoint not configured".into()))?;

        let file_part = multipart::Part::bytes(audio.to_vec()).file_name(filename_hint.to_string());

        let form = multipart::Form::new()
            .text("model", endpoint.model.clone())
            .text("language", language_hint.to_string())
            .text("response_format", "json")
            .part("file", file_part);

        debug!(
            model = %endpoint.model,
            host = %endpoint.base_url,
            bytes = audio.len(),
            "Sending audio to transcription API"
        );

        let req_builder = self
            .http_client
            .post(format!("{}/v1/audio/transcriptions", endpoint.base_url))
            .timeout(self.timeout)
            .multipart(form);

        let response = Self::authorize(req_builder, endpoint.api_key.as_deref())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "Transcription API error {}: {}",
                status, body
            )));
        }

        let transcription: TranscriptionResponse = response.json().await?;
        debug!(chars = transcription.text.len(), "Transcription completed");

        Ok(transcription.text.trim().to_string())
    }

    async fn health_check(&self) -> bool {
        let req_builder = self
            .http_client
            .get(format!("{}/v1/models", self.base_url))
            .timeout(Duration::from_secs(5));

        match Self::authorize(req_builder, self.api_key.as_deref())
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
