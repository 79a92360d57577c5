//! Receipt analysis handler

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use tracing::debug;

use crate::{AppError, AppState};
use savvybee_core::decode_image_payload;

pub const NO_IMAGE_ERROR: &str = "No image provided";
pub const INVALID_IMAGE_ERROR: &str = "Invalid image data";

/// POST /analyze-receipt - Describe a receipt image
///
/// Body: `{"image": "<base64 or data URL>"}`. The response is the JSON object
/// found in the model reply, or the receipt fallback when there is none.
pub async fn analyze_receipt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) =
        payload.map_err(|e| AppError::from_rejection(e.status(), NO_IMAGE_ERROR))?;

    let image = payload
        .get("image")
        .and_then(Value::as_str)
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| AppError::bad_request(NO_IMAGE_ERROR))?;

    let image = decode_image_payload(image)
        .map_err(|e| AppError::bad_request(INVALID_IMAGE_ERROR).with_details(e))?;
    debug!(bytes = image.data.len(), mime = %image.mime_type, "Receipt image decoded");

    let analysis = state.advisor.analyze_receipt(image).await?;

    Ok(Json(analysis))
}
