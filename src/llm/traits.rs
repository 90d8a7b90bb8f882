use std::sync::Arc;
use crate::llm::{LLMResult, GenerateResult, GenerationRequest};
use futures::future::BoxFuture;

/// Convert a concrete L into an `Arc<dyn LLM>`.
pub fn llm_to_arc_dyn<L>(llm: L) -> Arc<dyn LLM>
where
    L: 'static + LLM,
{
    Arc::new(llm)
}

/// Inference provider seam.
///
/// Returns a `BoxFuture` tied to `'a` rather than going through `async_trait`, so
/// implementations can borrow the request instead of cloning the prompt.
pub trait LLM: Send + Sync {
    /// Short provider name, used in logs.
    fn name(&self) -> &str;

    /// Produce a single completion for `request.prompt`.
    fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>>;
}
