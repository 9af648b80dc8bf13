//! Agents
//!
//! Thin prompt wrappers over [`crate::llm::LLM`]:
//!
//! - **Summary Agent**: condenses extracted document text
//! - **Query Agent**: answers free-form queries
//!
//! Neither agent returns an error. A failed completion is reported to the
//! caller as ordinary text starting with `"Error: "`.

pub mod query;
pub mod summary;

pub use query::QueryAgent;
pub use summary::SummaryAgent;

use crate::types::AppError;

pub const ERROR_PREFIX: &str = "Error: ";

pub(crate) fn error_text(error: &AppError) -> String {
    format!("{}{}", ERROR_PREFIX, error)
}
