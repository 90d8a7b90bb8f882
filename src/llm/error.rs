use super::ollama::OllamaError;
use async_openai::error::OpenAIError;


#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider rejected the credential ({0})")]
    Unauthorized(u16),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Ollama error: {0}")]
    OllamaError(#[from] OllamaError),

    #[error("OpenAI error: {0}")]
    OpenAIError(#[from] OpenAIError),

    #[error("JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid provider endpoint: {0}")]
    InvalidEndpoint(String),
}

impl LLMError {
    /// Classify a non-2xx provider response.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => LLMError::Unauthorized(status),
            429 => LLMError::RateLimitExceeded(body),
            _ => LLMError::Status { status, body },
        }
    }
}
