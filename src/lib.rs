pub mod config;
pub mod extract;
pub mod llm;
pub mod generator;
pub mod executor;
pub mod agent;
pub mod error;

pub use agent::{AgentOrchestrator, traits::AgentRunner};
pub use config::{AgentConfig, GenerationParams, Provider};
pub use executor::{RemoteExecutor, types::ExecutionResult};
pub use extract::CodeExtractor;
pub use generator::LLMCodeGenerator;
