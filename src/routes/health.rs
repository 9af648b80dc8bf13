use axum::{routing::get, Json, Router};
use crate::models::HealthResponse;

pub fn router() -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health_check))
}

async fn liveness() -> Json<bool> {
    Json(true)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
