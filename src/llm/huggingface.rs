//! HuggingFace Inference API, text-generation task.

use futures::{FutureExt, future::BoxFuture};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Credential;
use crate::llm::{
    traits::LLM,
    error::LLMError,
    GenerateResult,
    GenerationRequest,
    LLMResult,
};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Debug, Serialize)]
struct TextGenerationBody<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Debug, Serialize)]
struct TextGenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    seed: i32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct TextGenerationOutput {
    generated_text: String,
}

#[derive(Debug, Clone)]
pub struct HuggingFace {
    client: reqwest::Client,
    api_key: Credential,
    base_url: String,
}

impl HuggingFace {
    pub fn new(api_key: Credential) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url.trim_end_matches('/'), model)
    }

    /// The API answers with either `[{"generated_text": ..}]` or a bare object.
    fn parse_generation(body: Value) -> LLMResult<String> {
        let first = match body {
            Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            Value::Array(_) => {
                return Err(LLMError::InvalidResponse("empty generation list".into()));
            }
            other => other,
        };
        if let Some(message) = first.get("error").and_then(Value::as_str) {
            return Err(LLMError::InvalidResponse(message.to_string()));
        }
        let output: TextGenerationOutput = serde_json::from_value(first)?;
        Ok(output.generated_text)
    }

    async fn text_generation(&self, request: &GenerationRequest) -> LLMResult<GenerateResult> {
        let body = TextGenerationBody {
            inputs: &request.prompt,
            parameters: TextGenerationParameters {
                max_new_tokens: request.params.max_new_tokens,
                temperature: request.params.temperature,
                do_sample: true,
                seed: request.params.seed,
                return_full_text: false,
            },
        };
        let endpoint = self.endpoint(&request.model);
        debug!(%endpoint, model = %request.model, "sending text-generation request");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LLMError::from_status(status.as_u16(), text));
        }

        let generation = Self::parse_generation(response.json::<Value>().await?)?;
        Ok(GenerateResult { generation, tokens: None })
    }
}

impl LLM for HuggingFace {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>> {
        self.text_generation(request).boxed()
    }
}
