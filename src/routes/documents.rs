use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    response::Response,
    routing::post,
    Router,
};
use bytes::Bytes;
use crate::agents::SummaryAgent;
use crate::documents::{self, Extraction};
use crate::models::AppState;
use crate::types::{AppError, AppResult};
use crate::utils::{format_line_breaks, TrailingBreak};
use super::{error_reply, text_reply};
use tracing::{error, info};

const FILE_FIELD: &str = "file";

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    Router::new()
        .route("/extract-text", post(extract_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// POST /extract-text - summarize an uploaded PDF or DOCX
///
/// Always answers 200: `{"text": ...}` for summaries and advisories,
/// `{"error": ...}` when the upload cannot be read or parsed.
async fn extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            error!(error = %rejection, "Rejected upload request");
            return error_reply(rejection.body_text());
        }
    };

    let (filename, bytes) = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_reply("No file uploaded"),
        Err(e) => {
            error!(error = %e, "Failed to read upload");
            return error_reply(e.to_string());
        }
    };

    info!(filename = %filename, size = bytes.len(), "Document upload received");

    match documents::extract_blocking(bytes, filename, state.config.documents.clone()).await {
        Ok(Extraction::Advisory(message)) => text_reply(message),
        Ok(Extraction::Text(text)) => {
            let summary = SummaryAgent::summarize(&state.llm, &text).await;
            text_reply(format_line_breaks(&summary, TrailingBreak::Keep))
        }
        Err(e) => {
            error!(error = %e, "Document extraction failed");
            error_reply(e.to_string())
        }
    }
}

/// First multipart field named `file`, with its filename and full contents.
async fn read_upload(multipart: &mut Multipart) -> AppResult<Option<(String, Bytes)>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
        return Ok(Some((filename, bytes)));
    }
    Ok(None)
}
