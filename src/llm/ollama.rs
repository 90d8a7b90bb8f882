
use std::sync::Arc;
use reqwest::Url;
use futures::{
    FutureExt,
    future::BoxFuture,
};
use tracing::debug;

use crate::llm::{
    traits::LLM,
    error::LLMError,
    GenerateResult,
    GenerationRequest,
    LLMResult,
    TokenUsage,
};

pub const DEFAULT_PORT: u16 = 11434;

pub use ollama_rs::{
    error::OllamaError,
    Ollama as OllamaClient,
    models::ModelOptions,
    generation::chat::{request::ChatMessageRequest, ChatMessage},
};


/// Local Ollama server. The model name comes from each request.
#[derive(Debug, Clone)]
pub struct Ollama {
    pub(crate) client: Arc<OllamaClient>,
}

impl Ollama {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    /// Connect to e.g. `http://gpu-box:11434`. A missing port means 11434.
    pub fn from_base_url(base_url: &str) -> LLMResult<Self> {
        let url = resolve_base_url(base_url)?;
        Ok(Self::new(Arc::new(OllamaClient::from_url(url))))
    }

    fn generate_request(&self, request: &GenerationRequest) -> ChatMessageRequest {
        let options = ModelOptions::default()
            .temperature(request.params.temperature)
            .seed(request.params.seed)
            .num_predict(request.params.max_new_tokens as i32);
        let messages = vec![ChatMessage::user(request.prompt.clone())];
        ChatMessageRequest::new(request.model.clone(), messages).options(options)
    }

    async fn chat(&self, request: &GenerationRequest) -> LLMResult<GenerateResult> {
        debug!(model = %request.model, "sending ollama chat request");
        let response = self
            .client
            .send_chat_messages(self.generate_request(request))
            .await?;

        let tokens = response.final_data.map(|final_data| {
            TokenUsage::new(
                final_data.prompt_eval_count as u32,
                final_data.eval_count as u32,
            )
        });

        Ok(GenerateResult {
            generation: response.message.content,
            tokens,
        })
    }
}

fn resolve_base_url(base_url: &str) -> LLMResult<Url> {
    let invalid = |reason: &str| LLMError::InvalidEndpoint(format!("{base_url}: {reason}"));
    let mut url = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
    if url.host().is_none() {
        return Err(invalid("missing host"));
    }
    if url.port().is_none() {
        url.set_port(Some(DEFAULT_PORT))
            .map_err(|_| invalid("cannot carry a port"))?;
    }
    Ok(url)
}

impl Default for Ollama {
    fn default() -> Self {
        Ollama::new(Arc::new(OllamaClient::default()))
    }
}

impl LLM for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>> {
        self.chat(request).boxed()
    }
}
