use crate::llm::openai::OPENAI_API_BASE;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub documents: DocumentLimits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

/// How completions are read back from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMTransport {
    /// One JSON body, first choice's message content.
    Buffered,
    /// Server-sent event deltas concatenated in arrival order.
    Streaming,
}

impl LLMTransport {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "buffered" | "http" => Some(LLMTransport::Buffered),
            "streaming" | "stream" => Some(LLMTransport::Streaming),
            _ => None,
        }
    }
}

impl std::fmt::Display for LLMTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMTransport::Buffered => write!(f, "buffered"),
            LLMTransport::Streaming => write!(f, "streaming"),
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub transport: LLMTransport,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
}

// Keeps the API key out of startup logs.
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("transport", &self.transport)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentLimits {
    pub max_pdf_pages: usize,
    pub max_docx_words: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_pdf_pages: 12,
            max_docx_words: 2700,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: OPENAI_API_BASE.to_string(),
            model: "gpt-4o-mini".to_string(),
            transport: LLMTransport::Buffered,
            max_tokens: 5000,
            temperature: 0.7,
            top_p: 1.0,
            timeout_secs: 60,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            cors_allowed_origins: Vec::new(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let mut origins = Vec::new();
        for name in ["BOOKIFY_FRONTEND_URL", "EXTRA_FRONTEND_URL"] {
            if let Some(origin) = lookup(name) {
                origins.push(origin);
            }
        }
        if let Some(list) = lookup("ALLOWED_ORIGINS") {
            origins.extend(list.split(',').map(str::to_string));
        }

        let transport = var("LLM_TRANSPORT", "buffered");

        Ok(Self {
            server: ServerConfig {
                port: var("PORT", "8000")
                    .parse()
                    .with_context(|| "Invalid PORT")?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: normalize_origins(origins),
                max_upload_bytes: var("MAX_UPLOAD_BYTES", &(25 * 1024 * 1024).to_string())
                    .parse()
                    .with_context(|| "Invalid MAX_UPLOAD_BYTES")?,
            },
            llm: LLMConfig {
                api_key: lookup("LLM_API_KEY")
                    .or_else(|| lookup("OPENAI_API_KEY"))
                    .unwrap_or_default(),
                base_url: var("LLM_BASE_URL", OPENAI_API_BASE),
                model: var("LLM_MODEL", "gpt-4o-mini"),
                transport: LLMTransport::from_id(&transport)
                    .ok_or_else(|| anyhow!("Unsupported LLM_TRANSPORT: {}", transport))?,
                max_tokens: var("LLM_MAX_TOKENS", "5000")
                    .parse()
                    .with_context(|| "Invalid LLM_MAX_TOKENS")?,
                temperature: 0.7,
                top_p: 1.0,
                timeout_secs: var("LLM_TIMEOUT_SECS", "60")
                    .parse()
                    .with_context(|| "Invalid LLM_TIMEOUT_SECS")?,
            },
            documents: DocumentLimits {
                max_pdf_pages: var("MAX_PDF_PAGES", "12")
                    .parse()
                    .with_context(|| "Invalid MAX_PDF_PAGES")?,
                max_docx_words: var("MAX_DOCX_WORDS", "2700")
                    .parse()
                    .with_context(|| "Invalid MAX_DOCX_WORDS")?,
            },
        })
    }
}

/// Trim entries, drop blanks and duplicates, keep first-seen order.
fn normalize_origins<I>(origins: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen: Vec<String> = Vec::new();
    for origin in origins {
        let origin = origin.trim().trim_end_matches('/').to_string();
        if !origin.is_empty() && !seen.contains(&origin) {
            seen.push(origin);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = from_vars(&[]).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.cors_allowed_origins.is_empty());
        assert_eq!(config.server.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.llm.base_url, OPENAI_API_BASE);
        assert_eq!(config.llm.transport, LLMTransport::Buffered);
        assert_eq!(config.llm.max_tokens, 5000);
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.documents.max_pdf_pages, 12);
        assert_eq!(config.documents.max_docx_words, 2700);
    }

    #[test]
    fn test_origins_from_all_sources() {
        let config = from_vars(&[
            ("BOOKIFY_FRONTEND_URL", "https://bookify.app/"),
            ("EXTRA_FRONTEND_URL", "http://localhost:5173"),
            ("ALLOWED_ORIGINS", "https://a.example, https://bookify.app,,https://b.example"),
        ])
        .unwrap();
        assert_eq!(
            config.server.cors_allowed_origins,
            vec![
                "https://bookify.app",
                "http://localhost:5173",
                "https://a.example",
                "https://b.example",
            ]
        );
    }

    #[test]
    fn test_api_key_fallback() {
        let config = from_vars(&[("OPENAI_API_KEY", "sk-openai")]).unwrap();
        assert_eq!(config.llm.api_key, "sk-openai");

        let config = from_vars(&[
            ("LLM_API_KEY", "sk-llm"),
            ("OPENAI_API_KEY", "sk-openai"),
        ])
        .unwrap();
        assert_eq!(config.llm.api_key, "sk-llm");
    }

    #[test]
    fn test_streaming_transport_and_overrides() {
        let config = from_vars(&[
            ("LLM_TRANSPORT", "stream"),
            ("PORT", "9000"),
            ("MAX_PDF_PAGES", "3"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(config.llm.transport, LLMTransport::Streaming);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.documents.max_pdf_pages, 3);
        assert_eq!(config.server.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_values_fail_startup() {
        let err = from_vars(&[("LLM_TRANSPORT", "carrier-pigeon")]).unwrap_err();
        assert!(err.to_string().contains("LLM_TRANSPORT"), "{}", err);

        let err = from_vars(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"), "{}", err);

        let err = from_vars(&[("MAX_PDF_PAGES", "twelve")]).unwrap_err();
        assert!(err.to_string().contains("MAX_PDF_PAGES"), "{}", err);
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn test_from_env_reads_process_environment() {
        let names = ["LLM_MODEL", "MAX_DOCX_WORDS"];
        let saved: Vec<Option<String>> = names.iter().map(|name| env::var(name).ok()).collect();

        env::set_var("LLM_MODEL", "env-model");
        env::set_var("MAX_DOCX_WORDS", "42");
        let result = Config::from_env();

        for (name, value) in names.iter().zip(saved) {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }

        let config = result.unwrap();
        assert_eq!(config.llm.model, "env-model");
        assert_eq!(config.documents.max_docx_words, 42);
    }

    #[test]
    fn test_normalize_origins() {
        let origins = normalize_origins(vec![
            "https://bookify.app/".to_string(),
            "  ".to_string(),
            "http://localhost:5173".to_string(),
            "https://bookify.app".to_string(),
        ]);
        assert_eq!(origins, vec!["https://bookify.app", "http://localhost:5173"]);
    }

    #[test]
    fn test_transport_from_id() {
        assert_eq!(LLMTransport::from_id("buffered"), Some(LLMTransport::Buffered));
        assert_eq!(LLMTransport::from_id(" Streaming "), Some(LLMTransport::Streaming));
        assert_eq!(LLMTransport::from_id("carrier-pigeon"), None);
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let config = LLMConfig {
            api_key: "sk-secret".to_string(),
            ..LLMConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_default_limits() {
        let limits = DocumentLimits::default();
        assert_eq!(limits.max_pdf_pages, 12);
        assert_eq!(limits.max_docx_words, 2700);
    }
}
