use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AgentConfig;
use crate::error::Result;
use crate::executor::{RemoteExecutor, types::ExecutionResult};
use crate::generator::LLMCodeGenerator;
use crate::llm::{self, traits::LLM};

pub mod traits;

use traits::AgentRunner;

/// Generates code for a task, then runs it remotely.
pub struct AgentOrchestrator {
    generator: LLMCodeGenerator,
    executor: RemoteExecutor,
}

impl AgentOrchestrator {
    pub fn new(generator: LLMCodeGenerator, executor: RemoteExecutor) -> Self {
        Self { generator, executor }
    }

    /// Wire both stages to one shared config, using the configured provider.
    pub fn from_config(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let llm = llm::from_config(&config)?;
        Ok(Self::with_llm(llm, config))
    }

    /// Same as [`AgentOrchestrator::from_config`] with a caller-supplied LLM.
    pub fn with_llm(llm: Arc<dyn LLM>, config: Arc<AgentConfig>) -> Self {
        Self::new(
            LLMCodeGenerator::new(llm, config.clone()),
            RemoteExecutor::new(config),
        )
    }

    pub fn generator(&self) -> &LLMCodeGenerator {
        &self.generator
    }

    pub fn executor(&self) -> &RemoteExecutor {
        &self.executor
    }
}

#[async_trait::async_trait]
impl AgentRunner for AgentOrchestrator {
    async fn run_task(&self, task: &str) -> ExecutionResult {
        info!("Task: {task}");
        let code = self.generator.generate_code(task).await;
        info!("Generated code:\n{code}");

        // An empty string means generation failed. It is still sent on purpose:
        // stage two does not depend on stage one succeeding.
        if code.is_empty() {
            warn!("no code was generated, submitting empty code");
        }

        info!("Executing code");
        self.executor.execute_code(&code).await
    }
}
