use super::{pdf_too_long, Extraction};
use crate::types::{AppError, AppResult};
use lopdf::Document;
use tracing::{debug, info};

/// Page count is checked before any page is decoded.
pub fn extract_pdf(bytes: &[u8], max_pages: usize) -> AppResult<Extraction> {
    let document = Document::load_mem(bytes)
        .map_err(|e| AppError::Document(format!("invalid PDF: {}", e)))?;

    // BTreeMap keyed by 1-based page number, so iteration is page order.
    let pages = document.get_pages();
    if pages.len() > max_pages {
        info!(pages = pages.len(), max_pages, "PDF exceeds page limit");
        return Ok(Extraction::Advisory(pdf_too_long(max_pages)));
    }

    let mut segments = Vec::with_capacity(pages.len());
    for page_number in pages.keys() {
        let text = document.extract_text(&[*page_number]).map_err(|e| {
            AppError::Document(format!("failed to read page {}: {}", page_number, e))
        })?;
        segments.push(text.trim_end().to_string());
    }

    debug!(pages = segments.len(), "Extracted PDF text");
    Ok(Extraction::Text(segments.join("\n").trim().to_string()))
}
