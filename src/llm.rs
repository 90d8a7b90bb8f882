pub mod traits;
pub mod huggingface;
pub mod ollama;
pub mod openai;
pub mod error;

use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::config::{AgentConfig, GenerationParams, Provider};
use traits::{LLM, llm_to_arc_dyn};

/// A single-prompt completion request with deterministic sampling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            params,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Result of a text generation from an LLM.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GenerateResult {
    /// Raw, usually markdown-formatted, model output.
    pub generation: String,
    /// Not every provider reports usage.
    #[serde(default)]
    pub tokens: Option<TokenUsage>,
}

/// Result type for LLM operations.
pub type LLMResult<T> = std::result::Result<T, error::LLMError>;

/// Build the provider selected in `config`.
pub fn from_config(config: &AgentConfig) -> LLMResult<Arc<dyn LLM>> {
    let llm = match config.provider() {
        Provider::HuggingFace => {
            let mut hf = huggingface::HuggingFace::new(config.api_key().clone());
            if let Some(base_url) = config.llm_base_url() {
                hf = hf.with_base_url(base_url);
            }
            llm_to_arc_dyn(hf)
        }
        Provider::Ollama => {
            let ollama = match config.llm_base_url() {
                Some(base_url) => ollama::Ollama::from_base_url(base_url)?,
                None => ollama::Ollama::default(),
            };
            llm_to_arc_dyn(ollama)
        }
        Provider::OpenAI => {
            let mut openai = openai::OpenAI::with_api_key(config.api_key().expose());
            if let Some(base_url) = config.llm_base_url() {
                openai = openai.with_api_base(base_url);
            }
            llm_to_arc_dyn(openai)
        }
    };
    Ok(llm)
}
