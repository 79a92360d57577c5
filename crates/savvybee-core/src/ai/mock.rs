//! Mock backend for testing
//!
//! Provides configurable canned replies for text generation and transcription.
//! Clones share their counters and request log, so a test can hand a clone to
//! the server and still inspect what reached the "upstream".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::TextRequest;
use super::AIBackend;

/// Reply used when no canned reply is configured
pub const DEFAULT_MOCK_REPLY: &str = "That's a solid move. Keep tracking your spending 🐝";

/// Transcription used when none is configured
pub const DEFAULT_MOCK_TRANSCRIPTION: &str = "How much did I spend on food this week?";

#[derive(Default)]
struct MockLog {
    text_calls: AtomicUsize,
    transcription_calls: AtomicUsize,
    requests: Mutex<Vec<TextRequest>>,
    audio: Mutex<Vec<(usize, String, String)>>,
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: String,
    transcription: String,
    failure: Option<String>,
    log: Arc<MockLog>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, default replies)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: DEFAULT_MOCK_REPLY.to_string(),
            transcription: DEFAULT_MOCK_TRANSCRIPTION.to_string(),
            failure: None,
            log: Arc::new(MockLog::default()),
        }
    }

    /// Reply with the given text for every generation call
    pub fn with_reply(mut self, reply: &str) -> Self {
        self.reply = reply.to_string();
        self
    }

    /// Return the given text for every transcription call
    pub fn with_transcription(mut self, text: &str) -> Self {
        self.transcription = text.to_string();
        self
    }

    /// Fail every upstream call with `Error::Upstream(message)`
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self.healthy = false;
        self
    }

    /// Number of `generate_text` calls made so far
    pub fn text_calls(&self) -> usize {
        self.log.text_calls.load(Ordering::SeqCst)
    }

    /// Number of `transcribe_audio` calls made so far
    pub fn transcription_calls(&self) -> usize {
        self.log.transcription_calls.load(Ordering::SeqCst)
    }

    /// Total upstream calls of any kind
    pub fn total_calls(&self) -> usize {
        self.text_calls() + self.transcription_calls()
    }

    /// Requests seen by `generate_text`, oldest first
    pub fn requests(&self) -> Vec<TextRequest> {
        self.log
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Most recent `generate_text` request
    pub fn last_request(&self) -> Option<TextRequest> {
        self.requests().pop()
    }

    /// (byte length, filename hint, language hint) per transcription call
    pub fn audio_uploads(&self) -> Vec<(usize, String, String)> {
        self.log.audio.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        self.log.text_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.log.requests.lock() {
            requests.push(request.clone());
        }

        match &self.failure {
            Some(message) => Err(Error::Upstream(message.clone())),
            None => Ok(self.reply.clone()),
        }
    }

    async fn transcribe_audio(
        &self,
        audio: &[u8],
        filename_hint: &str,
        language_hint: &str,
    ) -> Result<String> {
        self.log.transcription_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut uploads) = self.log.audio.lock() {
            uploads.push((
                audio.len(),
                filename_hint.to_string(),
                language_hint.to_string(),
            ));
        }

        match &self.failure {
            Some(message) => Err(Error::Upstream(message.clone())),
            None => Ok(self.transcription.clone()),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
