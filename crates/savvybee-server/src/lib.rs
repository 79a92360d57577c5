//! SavvyBee Web Server
//!
//! Axum-based REST API in front of the upstream language-model services.
//!
//! - `POST /chat`, `/analyze-receipt`, `/financial-summary`, `/transcribe`
//! - `GET /` (static index or welcome payload) and `GET /health`
//! - Permissive CORS unless an origin list is configured
//! - Upload size limit and uniform `{error, details?}` error bodies

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use savvybee_core::{AIBackend, Advisor, Settings};

mod handlers;

/// Maximum request body size (25 MB, the transcription service's file limit)
pub const MAX_UPLOAD_SIZE: usize = 25 * 1024 * 1024;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            allowed_origins: settings.allowed_origins.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub advisor: Advisor,
    /// Directory holding the client build (index.html and assets)
    pub static_dir: Option<PathBuf>,
}

/// Create the application router
pub fn create_router(advisor: Advisor, static_dir: Option<&str>, config: ServerConfig) -> Router {
    info!(
        "AI backend configured: {} (chat: {}, receipts: {})",
        advisor.client().host(),
        advisor.chat_model(),
        advisor.receipt_model()
    );

    let state = Arc::new(AppState {
        advisor,
        static_dir: static_dir.map(PathBuf::from),
    });

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);
    let cors = if config.allowed_origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    };

    let mut app = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/analyze-receipt", post(handlers::analyze_receipt))
        .route("/financial-summary", post(handlers::financial_summary))
        .route("/transcribe", post(handlers::transcribe))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    advisor: Advisor,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    check_ai_connection(&advisor).await;

    let app = create_router(advisor, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log upstream connection status
pub async fn check_ai_connection(advisor: &Advisor) -> bool {
    let client = advisor.client();
    let reachable = client.health_check().await;

    if reachable {
        info!(
            "✅ AI backend connected: {} (chat: {})",
            client.host(),
            advisor.chat_model()
        );
    } else {
        warn!(
            "⚠️  AI backend configured but not responding: {} (chat: {})",
            client.host(),
            advisor.chat_model()
        );
    }

    reachable
}

// ============================================================================
// Error Handling
// ============================================================================

/// Error body shared by every endpoint
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    details: Option<String>,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            details: None,
            internal: None,
        }
    }

    pub fn payload_too_large() -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "Request too large".to_string(),
            details: None,
            internal: None,
        }
    }

    /// Map a body extractor rejection: 413 when the body limit was hit,
    /// otherwise the endpoint's validation message
    pub fn from_rejection(status: StatusCode, validation_msg: &str) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::payload_too_large()
        } else {
            Self::bad_request(validation_msg)
        }
    }

    pub fn with_details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Upstream call failed");
        }

        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Server error".to_string(),
            details: Some(err.to_string()),
            internal: Some(err),
        }
    }
}
