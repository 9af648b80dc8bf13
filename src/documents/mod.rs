//! Document text extraction
//!
//! Uploaded files are parsed entirely in memory; nothing touches the disk.
//! - `.pdf` via `lopdf`, capped by page count before any text is pulled out
//! - `.docx` via `docx-rust`, capped by word count after paragraph extraction
//!
//! Size limits exist to bound downstream LLM cost. A document over its limit
//! yields an [`Extraction::Advisory`] and must not be summarized.

pub mod docx;
pub mod pdf;

use crate::config::DocumentLimits;
use crate::types::{AppError, AppResult};
use bytes::Bytes;
use std::path::Path;
use tracing::{debug, info};

pub const UNSUPPORTED_FILE_TYPE: &str = "Unsupported file type. Please upload PDF or DOCX.";
pub const NO_READABLE_TEXT: &str = "No readable text found in the document.";

pub fn pdf_too_long(max_pages: usize) -> String {
    format!(
        "Document too long. Please upload a PDF with at most {} pages.",
        max_pages
    )
}

pub fn docx_too_large(max_words: usize) -> String {
    format!(
        "Document too large. Please upload a DOCX with at most {} words.",
        max_words
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Case-insensitive match on the filename's extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Pdf => write!(f, "pdf"),
            DocumentKind::Docx => write!(f, "docx"),
        }
    }
}

/// Outcome of reading an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Trimmed document text, ready to summarize.
    Text(String),
    /// User-facing message returned in place of a summary.
    Advisory(String),
}

impl Extraction {
    pub fn is_advisory(&self) -> bool {
        matches!(self, Extraction::Advisory(_))
    }
}

/// Extract plain text from `bytes`, dispatching on the extension of `filename`.
///
/// Parser failures are `AppError::Document`; size and type problems are advisories.
pub fn extract(bytes: &[u8], filename: &str, limits: &DocumentLimits) -> AppResult<Extraction> {
    let kind = match DocumentKind::from_filename(filename) {
        Some(kind) => kind,
        None => {
            info!(filename, "Rejecting unsupported file type");
            return Ok(Extraction::Advisory(UNSUPPORTED_FILE_TYPE.to_string()));
        }
    };

    debug!(filename, %kind, size = bytes.len(), "Extracting document text");

    let extraction = match kind {
        DocumentKind::Pdf => pdf::extract_pdf(bytes, limits.max_pdf_pages)?,
        DocumentKind::Docx => docx::extract_docx(bytes, limits.max_docx_words)?,
    };

    Ok(match extraction {
        Extraction::Text(text) if text.is_empty() => {
            info!(filename, "Document contains no extractable text");
            Extraction::Advisory(NO_READABLE_TEXT.to_string())
        }
        other => other,
    })
}

/// Run [`extract`] on the blocking pool; parsing is CPU-bound.
pub async fn extract_blocking(
    bytes: Bytes,
    filename: String,
    limits: DocumentLimits,
) -> AppResult<Extraction> {
    tokio::task::spawn_blocking(move || extract(&bytes, &filename, &limits))
        .await
        .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))?
}
