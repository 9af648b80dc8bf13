// Streaming chat-completion adapter
// Sends `stream: true` and folds the server-sent `delta.content` fragments
// back into one completion in arrival order.

use crate::llm::openai::{completions_url, describe_error, ChatRequest};
use crate::llm::provider::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::debug;

pub struct StreamingAdapter {
    client: Client,
    api_key: String,
    api_base: String,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, PartialEq)]
enum SseEvent {
    Delta(String),
    Finished(String),
    Done,
}

/// Line-oriented decoder for `text/event-stream` bodies.
///
/// Network chunks may split a line (or a UTF-8 sequence) anywhere, so raw bytes
/// are buffered until a full line is available.
#[derive(Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<AppResult<SseEvent>> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = decode_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that arrived without a newline.
    fn finish(&mut self) -> Option<AppResult<SseEvent>> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        decode_line(&String::from_utf8_lossy(&line))
    }
}

fn decode_line(line: &str) -> Option<AppResult<SseEvent>> {
    let line = line.trim_end_matches(['\r', '\n']);
    // Comments, `event:`/`id:` fields and blank separators carry no text.
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }
    if payload == "[DONE]" {
        return Some(Ok(SseEvent::Done));
    }

    let chunk: StreamChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(Err(AppError::LLMApi(format!(
                "Failed to parse stream event: {}",
                e
            ))))
        }
    };
    let choice = chunk.choices.into_iter().next()?;
    match (choice.delta.content, choice.finish_reason) {
        (Some(text), _) if !text.is_empty() => Some(Ok(SseEvent::Delta(text))),
        (_, Some(reason)) => Some(Ok(SseEvent::Finished(reason))),
        _ => None,
    }
}

struct StreamState {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<AppResult<SseEvent>>,
    exhausted: bool,
}

impl StreamingAdapter {
    pub fn new_with_api_base(api_key: &str, api_base: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.to_string(),
        }
    }

    async fn open_event_stream(
        &self,
        request: &LLMRequest,
    ) -> AppResult<BoxStream<'static, AppResult<SseEvent>>> {
        let url = completions_url(&self.api_base);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "text/event-stream")
            .json(&ChatRequest::from_request(request, true))
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(describe_error(status, &error_text));
        }

        let state = StreamState {
            body: response.bytes_stream().boxed(),
            decoder: SseDecoder::default(),
            pending: VecDeque::new(),
            exhausted: false,
        };

        let events = stream::unfold(state, |mut state| async move {
            loop {
                if let Some(event) = state.pending.pop_front() {
                    return Some((event, state));
                }
                if state.exhausted {
                    return None;
                }
                match state.body.next().await {
                    Some(Ok(chunk)) => {
                        let decoded = state.decoder.push(&chunk);
                        state.pending.extend(decoded);
                    }
                    Some(Err(e)) => {
                        state.exhausted = true;
                        state
                            .pending
                            .push_back(Err(AppError::LLMApi(format!("stream interrupted: {}", e))));
                    }
                    None => {
                        state.exhausted = true;
                        if let Some(event) = state.decoder.finish() {
                            state.pending.push_back(event);
                        }
                    }
                }
            }
        });

        Ok(events.boxed())
    }
}

#[async_trait]
impl LLMAdapter for StreamingAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        let mut events = self.open_event_stream(request).await?;

        let mut content = String::new();
        let mut finish_reason = None;
        let mut fragments = 0usize;
        while let Some(event) = events.next().await {
            match event? {
                SseEvent::Delta(text) => {
                    fragments += 1;
                    content.push_str(&text);
                }
                SseEvent::Finished(reason) => finish_reason = Some(reason),
                SseEvent::Done => break,
            }
        }

        debug!(fragments, chars = content.len(), "Accumulated streamed completion");

        Ok(LLMResponse {
            content,
            finish_reason,
            usage: None,
        })
    }
}
