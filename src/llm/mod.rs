// LLM abstraction layer

pub mod provider;
pub mod openai;
pub mod streaming;

pub use provider::*;
