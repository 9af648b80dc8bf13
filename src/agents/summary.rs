//! Summary Agent
//!
//! Condenses extracted document text into a short prose summary.

use crate::llm::LLM;
use tracing::{error, info};

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant that summarizes long text into a \
concise summary. Do not use bullet points or numbered lists. When the content has a point-like \
structure, put each point on its own line using line breaks.";

pub struct SummaryAgent;

impl SummaryAgent {
    /// Summarize `text`. Never fails: provider errors come back as `"Error: ..."` text.
    pub async fn summarize(llm: &LLM, text: &str) -> String {
        info!(text_len = text.len(), "Generating summary");

        match llm.complete(SUMMARY_SYSTEM_PROMPT, &Self::create_prompt(text)).await {
            Ok(summary) => {
                info!(summary_len = summary.len(), "Generated summary successfully");
                summary
            }
            Err(e) => {
                error!(error = %e, "Summary generation failed");
                super::error_text(&e)
            }
        }
    }

    fn create_prompt(text: &str) -> String {
        format!(
            "Summarize the following text into a concise summary:\n\n{}",
            text
        )
    }
}
