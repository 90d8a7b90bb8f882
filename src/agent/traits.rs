
use crate::executor::types::ExecutionResult;

/// Something that can take a task description all the way to an execution result.
#[async_trait::async_trait]
pub trait AgentRunner: Send + Sync {
    /// Generate code for `task`, run it, and return what the execution service said.
    /// Failures are reported inside the result, never as an error.
    async fn run_task(&self, task: &str) -> ExecutionResult;
}
