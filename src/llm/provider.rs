use crate::config::{LLMConfig, LLMTransport};
use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Provider-agnostic completion client.
///
/// Every call carries the same sampling parameters from [`LLMConfig`] and is
/// bounded by `timeout_secs`.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    timeout: Duration,
}

impl LLM {
    pub fn new(config: &LLMConfig) -> Self {
        let adapter: Arc<dyn LLMAdapter> = match config.transport {
            LLMTransport::Buffered => Arc::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &config.api_key,
                &config.base_url,
            )),
            LLMTransport::Streaming => Arc::new(
                crate::llm::streaming::StreamingAdapter::new_with_api_base(
                    &config.api_key,
                    &config.base_url,
                ),
            ),
        };

        info!(
            transport = %config.transport,
            model = %config.model,
            base_url = %config.base_url,
            "LLM client configured"
        );

        Self::with_adapter(adapter, config)
    }

    /// Use a caller-supplied adapter with the sampling settings from `config`.
    pub fn with_adapter(adapter: Arc<dyn LLMAdapter>, config: &LLMConfig) -> Self {
        Self {
            adapter,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn build_request(&self, system: &str, user: &str) -> LLMRequest {
        LLMRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage::system(system), LLMMessage::user(user)],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
        }
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        match tokio::time::timeout(self.timeout, self.adapter.create_chat_completion(request)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(self.timeout.as_secs())),
        }
    }

    /// Send one system + user exchange and return the trimmed completion text.
    pub async fn complete(&self, system: &str, user: &str) -> AppResult<String> {
        let request = self.build_request(system, user);
        let started = Instant::now();
        let response = self.create_chat_completion(&request).await?;

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            finish_reason = ?response.finish_reason,
            total_tokens = ?response.usage.as_ref().map(|u| u.total_tokens),
            "LLM completion received"
        );

        Ok(response.content.trim().to_string())
    }
}
