use crate::config::Config;
use crate::llm::LLM;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: LLM,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = LLM::new(&config.llm);
        Self { config, llm }
    }

    pub fn with_llm(config: Config, llm: LLM) -> Self {
        Self { config, llm }
    }
}

/// Body of `POST /get-summary-of-text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Normal reply: a summary, an answer, an advisory or `"Error: ..."` text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
}

/// Reply for failures caught while reading an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
