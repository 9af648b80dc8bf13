use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    routing::post,
    Json, Router,
};
use crate::agents::QueryAgent;
use crate::models::{AppState, TextRequest};
use crate::utils::{format_line_breaks, TrailingBreak};
use super::{error_reply, text_reply};
use tracing::{error, info};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get-summary-of-text", post(get_summary_of_text))
        .with_state(state)
}

/// POST /get-summary-of-text - answer a free-form query
///
/// A body that is not `{"text": "..."}` JSON is answered in-band as `{"error": ...}`.
async fn get_summary_of_text(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            error!(error = %rejection, "Rejected text query");
            return error_reply(rejection.body_text());
        }
    };

    info!(text_len = request.text.len(), "Received text query");

    let answer = QueryAgent::resolve(&state.llm, &request.text).await;

    text_reply(format_line_breaks(&answer, TrailingBreak::Trim))
}
