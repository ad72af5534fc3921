//! Webhook receiving gateway events

use super::types::WebhookEnvelope;
use crate::runtime::TransportEvent;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

/// Shared webhook state
#[derive(Clone)]
pub struct WebhookState {
    events: mpsc::Sender<TransportEvent>,
}

impl WebhookState {
    pub fn new(events: mpsc::Sender<TransportEvent>) -> Self {
        Self { events }
    }
}

pub fn create_router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(receive_event))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn receive_event(
    State(state): State<WebhookState>,
    Json(envelope): Json<WebhookEnvelope>,
) -> Result<StatusCode, AppError> {
    let event = envelope.into_event().map_err(|e| {
        tracing::warn!(error = %e, "Rejected webhook call");
        AppError::BadRequest(e.to_string())
    })?;

    let Some(event) = event else {
        return Ok(StatusCode::OK);
    };

    state
        .events
        .send(event)
        .await
        .map_err(|_| AppError::Unavailable("Bot is shutting down".to_string()))?;

    Ok(StatusCode::ACCEPTED)
}

async fn health() -> &'static str {
    "ok"
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
