// Chat completions against OpenAI or any OpenAI-compatible gateway.
pub use async_openai::{
    Client, config::OpenAIConfig
};
use async_openai::types::{
    ChatCompletionRequestMessage,
    ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
};
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

pub struct OpenAI {
    pub client: Client<OpenAIConfig>,
    config: OpenAIConfig,
}

impl OpenAI {
    pub fn new() -> Self {
        Self::with_config(OpenAIConfig::new())
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key))
    }

    fn with_config(config: OpenAIConfig) -> Self {
        Self {
            client: Client::with_config(config.clone()),
            config,
        }
    }

    pub fn with_api_base(self, api_base: impl Into<String>) -> Self {
        Self::with_config(self.config.with_api_base(api_base))
    }

    fn build_request(&self, request: &GenerationRequest) -> LLMResult<CreateChatCompletionRequest> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.clone())
            .build()?
            .into();
        let built = CreateChatCompletionRequestArgs::default()
            .model(request.model.clone())
            .messages(vec![message])
            .max_completion_tokens(request.params.max_new_tokens)
            .temperature(request.params.temperature)
            .seed(i64::from(request.params.seed))
            .build()?;
        Ok(built)
    }

    async fn complete(&self, request: &GenerationRequest) -> LLMResult<GenerateResult> {
        let api_request = self.build_request(request)?;
        debug!(model = %request.model, "sending chat completion request");
        let response = self.client.chat().create(api_request).await?;

        let tokens = response
            .usage
            .map(|usage| TokenUsage::new(usage.prompt_tokens, usage.completion_tokens));
        let generation = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LLMError::InvalidResponse("no choices in response".into()))?;

        Ok(GenerateResult { generation, tokens })
    }
}

impl Default for OpenAI {
    fn default() -> Self {
        Self::new()
    }
}

impl LLM for OpenAI {
    fn name(&self) -> &str {
        "openai"
    }

    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>> {
        self.complete(request).boxed()
    }
}
