//! Pluggable upstream AI backend abstraction
//!
//! This module provides a backend-agnostic interface for the two upstream
//! operations SavvyBee needs: text generation and audio transcription.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all upstream calls
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `MockBackend`
//! - `parsing`: JSON extraction from free-text replies
//!
//! Every call is a single request with a fixed timeout. Nothing is retried;
//! failures surface to the caller as `Error::Http` or `Error::Upstream`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let settings = Settings::from_env()?;
//! let ai = AIClient::from_settings(&settings);
//!
//! let request = TextRequest::new(system, "How am I doing?", &settings.chat.model);
//! let reply = ai.generate_text(&request).await?;
//! ```

mod mock;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::{MockBackend, DEFAULT_MOCK_REPLY, DEFAULT_MOCK_TRANSCRIPTION};
pub use openai_compatible::{OpenAICompatibleBackend, UPSTREAM_TIMEOUT};
pub use types::*;

use async_trait::async_trait;

use crate::config::Settings;
use crate::error::Result;

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate a reply for one system + user prompt pair
    async fn generate_text(&self, request: &TextRequest) -> Result<String>;

    /// Transcribe an in-memory audio file
    ///
    /// `filename_hint` lets the service infer the container format.
    async fn transcribe_audio(
        &self,
        audio: &[u8],
        filename_hint: &str,
        language_hint: &str,
    ) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the default model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI-compatible hosted APIs (Groq, OpenAI, vLLM, ...)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create the production client from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        AIClient::OpenAICompatible(OpenAICompatibleBackend::from_settings(settings))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }
}

impl From<MockBackend> for AIClient {
    fn from(backend: MockBackend) -> Self {
        AIClient::Mock(backend)
    }
}

impl From<OpenAICompatibleBackend> for AIClient {
    fn from(backend: OpenAICompatibleBackend) -> Self {
        AIClient::OpenAICompatible(backend)
    }
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.generate_text(request).await,
            AIClient::Mock(b) => b.generate_text(request).await,
        }
    }

    async fn transcribe_audio(
        &self,
        audio: &[u8],
        filename_hint: &str,
        language_hint: &str,
    ) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => {
                b.transcribe_audio(audio, filename_hint, language_hint)
                    .await
            }
            AIClient::Mock(b) => {
                b.transcribe_audio(audio, filename_hint, language_hint)
                    .await
            }
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}
