//! Landing page and health handlers

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::AppState;
use savvybee_core::AIBackend;

/// GET / - Client index page, or a welcome payload when no client is deployed
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    if let Some(dir) = &state.static_dir {
        if let Ok(html) = tokio::fs::read_to_string(dir.join("index.html")).await {
            return Html(html).into_response();
        }
    }

    Json(json!({
        "name": "SavvyBee",
        "message": "Welcome to SavvyBee, your financial friend 🐝",
        "endpoints": ["/chat", "/analyze-receipt", "/financial-summary", "/transcribe", "/health"]
    }))
    .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub chat_model: String,
    pub host: String,
    pub upstream_reachable: bool,
}

/// GET /health - Server liveness plus upstream reachability
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let client = state.advisor.client();
    let upstream_reachable = client.health_check().await;

    Json(HealthResponse {
        status: if upstream_reachable { "ok" } else { "degraded" },
        chat_model: state.advisor.chat_model().to_string(),
        host: client.host().to_string(),
        upstream_reachable,
    })
}
