use super::{docx_too_large, Extraction};
use crate::types::{AppError, AppResult};
use docx_rust::document::BodyContent;
use docx_rust::DocxFile;
use std::io::Cursor;
use tracing::{debug, info};

/// Paragraph text in document order, one paragraph per line.
///
/// The whole body is read before the word limit applies; the limit only gates
/// summarization.
pub fn extract_docx(bytes: &[u8], max_words: usize) -> AppResult<Extraction> {
    let file = DocxFile::from_reader(Cursor::new(bytes))
        .map_err(|e| AppError::Document(format!("invalid DOCX: {}", e)))?;
    let docx = file
        .parse()
        .map_err(|e| AppError::Document(format!("invalid DOCX: {}", e)))?;

    let paragraphs: Vec<String> = docx
        .document
        .body
        .content
        .iter()
        .filter_map(|content| match content {
            BodyContent::Paragraph(paragraph) => Some(paragraph.text()),
            _ => None,
        })
        .collect();

    let text = paragraphs.join("\n").trim().to_string();
    let words = text.split_whitespace().count();
    if words > max_words {
        info!(words, max_words, "DOCX exceeds word limit");
        return Ok(Extraction::Advisory(docx_too_large(max_words)));
    }

    debug!(paragraphs = paragraphs.len(), words, "Extracted DOCX text");
    Ok(Extraction::Text(text))
}
