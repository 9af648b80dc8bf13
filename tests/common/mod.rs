#![allow(dead_code)]

use async_trait::async_trait;
use bookify::config::{Config, LLMConfig};
use bookify::llm::{LLMAdapter, LLM};
use bookify::types::{AppError, AppResult, LLMRequest, LLMResponse};
use bookify::{create_router, AppState};
use docx_rust::document::Paragraph;
use docx_rust::Docx;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

pub const BOUNDARY: &str = "bookify-test-boundary";

/// Records every request and answers with a canned reply.
pub struct SpyAdapter {
    requests: Mutex<Vec<LLMRequest>>,
    reply: Result<String, String>,
}

impl SpyAdapter {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for SpyAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(LLMResponse {
                content: text.clone(),
                finish_reason: Some("stop".to_string()),
                usage: None,
            }),
            Err(message) => Err(AppError::LLMApi(message.clone())),
        }
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.cors_allowed_origins = vec!["http://localhost:5173".to_string()];
    config
}

pub fn router_with_adapter(adapter: Arc<SpyAdapter>) -> axum::Router {
    router_with_config(test_config(), adapter)
}

pub fn router_with_config(config: Config, adapter: Arc<SpyAdapter>) -> axum::Router {
    let llm = LLM::with_adapter(adapter, &config.llm);
    create_router(AppState::with_llm(config, llm))
}

pub fn router_with_llm_config(llm_config: LLMConfig) -> axum::Router {
    let mut config = test_config();
    config.llm = llm_config;
    create_router(AppState::new(config))
}

/// Single-part multipart body carrying `bytes` under `field`.
pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn build_pdf(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let mut docx = Docx::default();
    for text in paragraphs {
        docx.document.push(Paragraph::default().push_text(*text));
    }
    docx.write(Cursor::new(Vec::new())).unwrap().into_inner()
}
