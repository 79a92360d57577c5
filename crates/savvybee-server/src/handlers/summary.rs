//! Financial summary handler

use std::sync::Arc;

use axum::{body::Bytes, extract::rejection::BytesRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppError, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummaryRequest {
    /// Accepted but not used in the prompt
    #[serde(default)]
    pub user_data: Option<Value>,
}

/// POST /financial-summary - Monthly spending overview
///
/// An empty body is accepted. The response is the JSON object found in the
/// model reply, or the summary fallback when there is none.
pub async fn financial_summary(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body.map_err(|e| AppError::from_rejection(e.status(), "Invalid request body"))?;

    let request = if body.iter().all(u8::is_ascii_whitespace) {
        FinancialSummaryRequest::default()
    } else {
        serde_json::from_slice::<FinancialSummaryRequest>(&body)
            .map_err(|e| AppError::bad_request("Invalid request body").with_details(e))?
    };

    let summary = state
        .advisor
        .financial_summary(request.user_data.as_ref())
        .await?;

    Ok(Json(summary))
}
