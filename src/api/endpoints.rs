//! API endpoint handlers
//!
//! This module implements the HTTP endpoints of the fact-check service and
//! the error boundary that turns every failure into a JSON body.

use crate::conversion::claim_converter::truncate_query;
use crate::core::config::Config;
use crate::core::constants::{detail, verdict};
use crate::core::source::FactCheckSource;
use crate::models::fact_check::{CheckNewsRequest, CheckNewsResponse};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, info_span, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn FactCheckSource>,
}

/// Errors surfaced at the HTTP boundary
///
/// Each renders as `{"detail": ...}`. Upstream and internal failures carry a
/// fixed message; the underlying error only goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidBody(String),

    #[error("{}", detail::UPSTREAM)]
    Upstream,

    #[error("{}", detail::INTERNAL)]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/check-news", post(check_news))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Render a handler panic as the generic 500 body
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!(panic = message, "Handler panicked");
    ApiError::Internal.into_response()
}

/// POST /check-news - Look up fact checks for a piece of news text
async fn check_news(
    State(state): State<AppState>,
    payload: Result<Json<CheckNewsRequest>, JsonRejection>,
) -> Result<Json<CheckNewsResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection, "Rejected /check-news body");
        ApiError::from(rejection)
    })?;

    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("check_news", %request_id, source = state.source.source_name());

    async move {
        info!(
            query = truncate_query(&request.text),
            chars = request.text.chars().count(),
            "📥 Incoming fact-check request"
        );

        let claims = state.source.search(&request.text).await.map_err(|e| {
            error!(error = %e, "Fact-check search failed");
            ApiError::Upstream
        })?;

        let summary = if claims.is_empty() {
            verdict::NONE_FOUND
        } else {
            verdict::FOUND
        };

        info!(claims = claims.len(), "Fact-check request complete");

        Ok(Json(CheckNewsResponse {
            verdict: summary.to_string(),
            google_fact_check: claims,
        }))
    }
    .instrument(span)
    .await
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let mode = if state.config.has_credential() {
        "live"
    } else {
        "mock"
    };

    Json(json!({
        "message": format!("Fact Check Service v{}", env!("CARGO_PKG_VERSION")),
        "status": "running",
        "mode": mode,
        "source": state.source.source_name(),
        "config": {
            "enrichment_enabled": state.config.enrichment_enabled,
            "enrichment_concurrency": state.config.enrichment_concurrency,
            "search_timeout": state.config.search_timeout,
            "image_timeout": state.config.image_timeout,
        },
        "endpoints": {
            "check_news": "/check-news",
            "health": "/health",
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /health - Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
