//! Chat handler

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::{AppError, AppState};

/// Returned for a missing, blank or non-text message
pub const EMPTY_MESSAGE_ERROR: &str = "Send a message next time";

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /chat - One conversational turn with the SavvyBee persona
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::from_rejection(e.status(), EMPTY_MESSAGE_ERROR))?;

    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::bad_request(EMPTY_MESSAGE_ERROR))?;

    let reply = state.advisor.chat(message).await?;

    Ok(Json(ChatResponse { reply }))
}
