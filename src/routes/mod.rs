//! API Routes
//!
//! - `GET /` and `GET /health` - liveness
//! - `POST /extract-text` - summarize an uploaded PDF/DOCX
//! - `POST /get-summary-of-text` - answer a free-form text query
//!
//! Every handled outcome is a 200; failures travel in-band as `{"error": ...}`
//! or as `"Error: ..."` text.

pub mod documents;
pub mod health;
pub mod summary;

use axum::{
    response::{IntoResponse, Response},
    Json, Router,
};
use crate::middleware::cors_layer;
use crate::models::{AppState, ErrorResponse, TextResponse};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(health::router())
        .merge(documents::router(state.clone()))
        .merge(summary::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub(crate) fn text_reply(text: impl Into<String>) -> Response {
    Json(TextResponse { text: text.into() }).into_response()
}

pub(crate) fn error_reply(error: impl Into<String>) -> Response {
    Json(ErrorResponse {
        error: error.into(),
    })
    .into_response()
}
