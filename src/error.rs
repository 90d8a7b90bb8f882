use crate::llm::error::LLMError;
use crate::executor::error::ExecutorError;
use crate::config::ConfigError;


#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("LLM error: {0}")]
    LLM(#[from] LLMError),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
