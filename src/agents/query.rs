//! Query Agent
//!
//! Answers free-form user queries that arrive without a document.

use crate::llm::LLM;
use tracing::{error, info};

pub const QUERY_SYSTEM_PROMPT: &str = "You are a helpful, knowledgeable assistant. Answer the \
user's query clearly and accurately. Do not use bullet points or numbered lists. When the answer \
has a point-like structure, put each point on its own line using line breaks.";

pub struct QueryAgent;

impl QueryAgent {
    /// Answer `query`. Never fails: provider errors come back as `"Error: ..."` text.
    pub async fn resolve(llm: &LLM, query: &str) -> String {
        info!(query_len = query.len(), "Resolving query");

        match llm.complete(QUERY_SYSTEM_PROMPT, query).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "Query resolution failed");
                super::error_text(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LLMConfig, LLMTransport};

    #[tokio::test]
    async fn test_query_uses_streaming_transport() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"there.\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "stream": true,
                "messages": [
                    {"role": "system", "content": QUERY_SYSTEM_PROMPT},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let config = LLMConfig {
            base_url: server.url(),
            transport: LLMTransport::Streaming,
            ..LLMConfig::default()
        };
        let answer = QueryAgent::resolve(&LLM::new(&config), "hello").await;

        mock.assert_async().await;
        assert_eq!(answer, "Hi there.");
    }

    #[tokio::test]
    async fn test_unreachable_provider_becomes_error_text() {
        let config = LLMConfig {
            // Nothing listens on the discard port.
            base_url: "http://127.0.0.1:9".to_string(),
            ..LLMConfig::default()
        };
        let answer = QueryAgent::resolve(&LLM::new(&config), "hello").await;
        assert!(answer.starts_with("Error: "), "{}", answer);
    }
}
