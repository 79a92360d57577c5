//! Audio transcription handler

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState};

pub const NO_AUDIO_ERROR: &str = "No audio file uploaded";

#[derive(Debug, Serialize)]
pub struct TranscriptionResponse {
    pub transcription: String,
}

/// POST /transcribe - Speech to text for a recorded voice note
///
/// Expects a multipart form with the recording in the `audio` field.
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResponse>, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::bad_request(NO_AUDIO_ERROR))?;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error(e, "Failed to read form field"))?
    {
        if field.name() == Some("audio") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| read_error(e, "Failed to read audio data"))?;
            audio = Some(bytes.to_vec());
        }
    }

    let audio = audio
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::bad_request(NO_AUDIO_ERROR))?;

    let transcription = state.advisor.transcribe(&audio).await?;

    Ok(Json(TranscriptionResponse { transcription }))
}

/// Body limit errors become 413; anything else is a malformed form
fn read_error(err: MultipartError, msg: &str) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large()
    } else {
        AppError::bad_request(msg).with_details(err)
    }
}
