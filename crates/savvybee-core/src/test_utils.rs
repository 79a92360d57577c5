//! Test utilities for savvybee-core
//!
//! This module provides a mock OpenAI-compatible upstream server that can be
//! used for development and integration tests. It answers the chat
//! completions, audio transcription and model listing endpoints, and records
//! what it received so tests can assert on the exact wire format.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// Transcription returned by the mock server (surrounding whitespace included)
pub const MOCK_TRANSCRIPTION: &str = "  Did I overspend on takeout this week?\n";

/// How the mock answers chat completion requests
#[derive(Debug, Clone)]
pub enum ChatBehavior {
    /// Echo the text of the last user message
    Echo,
    /// Always return this content
    Reply(String),
    /// Return `"content": null`
    NullContent,
    /// Respond with HTTP 500
    Fail,
    /// Wait this long, then echo
    Delay(Duration),
}

/// One multipart upload received on the transcription endpoint
#[derive(Debug, Clone, Default)]
pub struct RecordedUpload {
    pub file_name: Option<String>,
    pub bytes: usize,
    pub model: Option<String>,
    pub language: Option<String>,
    pub response_format: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Recorded {
    chat_requests: Mutex<Vec<(Option<String>, Value)>>,
    uploads: Mutex<Vec<RecordedUpload>>,
}

#[derive(Clone)]
struct MockState {
    behavior: ChatBehavior,
    recorded: Arc<Recorded>,
}

/// Mock OpenAI-compatible server for testing and development
pub struct MockUpstreamServer {
    addr: SocketAddr,
    recorded: Arc<Recorded>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstreamServer {
    /// Start an echoing mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(ChatBehavior::Echo).await
    }

    /// Start a mock server that always replies with `reply`
    pub async fn start_with_reply(reply: &str) -> Self {
        Self::start_with(ChatBehavior::Reply(reply.to_string())).await
    }

    /// Start a mock server with the given chat behavior
    pub async fn start_with(behavior: ChatBehavior) -> Self {
        let recorded = Arc::new(Recorded::default());
        let state = MockState {
            behavior,
            recorded: recorded.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .route("/v1/audio/transcriptions", post(handle_transcription))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            recorded,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Chat completion bodies received so far, oldest first
    pub fn chat_requests(&self) -> Vec<Value> {
        self.recorded
            .chat_requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Authorization header of each chat completion request
    pub fn chat_authorizations(&self) -> Vec<Option<String>> {
        self.recorded
            .chat_requests
            .lock()
            .unwrap()
            .iter()
            .map(|(auth, _)| auth.clone())
            .collect()
    }

    /// Transcription uploads received so far
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.recorded.uploads.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockUpstreamServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Model listing (health check)
async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "llama3-70b-8192", "object": "model", "owned_by": "mock"}]
    }))
}

async fn handle_chat(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state
        .recorded
        .chat_requests
        .lock()
        .unwrap()
        .push((authorization(&headers), body.clone()));

    let content = match &state.behavior {
        ChatBehavior::Fail => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": {"message": "mock upstream failure"}})),
            )
                .into_response();
        }
        ChatBehavior::NullContent => Value::Null,
        ChatBehavior::Reply(reply) => Value::String(reply.clone()),
        ChatBehavior::Echo => Value::String(last_user_text(&body)),
        ChatBehavior::Delay(delay) => {
            tokio::time::sleep(*delay).await;
            Value::String(last_user_text(&body))
        }
    };

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}

/// Text of the last user message, whether plain or multimodal
fn last_user_text(body: &Value) -> String {
    let Some(message) = body["messages"]
        .as_array()
        .and_then(|m| m.iter().rev().find(|m| m["role"] == "user"))
    else {
        return String::new();
    };

    match &message["content"] {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter(|p| p["type"] == "text")
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

async fn handle_transcription(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut upload = RecordedUpload {
        authorization: authorization(&headers),
        ..Default::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            upload.file_name = field.file_name().map(str::to_string);
            upload.bytes = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            continue;
        }

        let value = field.text().await.ok();
        match name.as_str() {
            "model" => upload.model = value,
            "language" => upload.language = value,
            "response_format" => upload.response_format = value,
            _ => {}
        }
    }

    let failing = matches!(state.behavior, ChatBehavior::Fail);
    state.recorded.uploads.lock().unwrap().push(upload);

    if failing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"message": "mock upstream failure"}})),
        )
            .into_response();
    }

    Json(json!({ "text": MOCK_TRANSCRIPTION })).into_response()
}
