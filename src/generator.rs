use std::sync::Arc;

use tracing::{debug, error};

use crate::config::AgentConfig;
use crate::extract::CodeExtractor;
use crate::llm::{
    traits::LLM,
    GenerationRequest,
    LLMResult,
};

/// Turns a task description into source code through an [`LLM`].
pub struct LLMCodeGenerator {
    llm: Arc<dyn LLM>,
    config: Arc<AgentConfig>,
    extractor: CodeExtractor,
}

impl LLMCodeGenerator {
    pub fn new(llm: Arc<dyn LLM>, config: Arc<AgentConfig>) -> Self {
        let extractor = CodeExtractor::new(config.language());
        Self { llm, config, extractor }
    }

    /// Fixed instruction that precedes every task.
    pub fn system_instruction(&self) -> String {
        let language = self.config.language();
        format!(
            "You are a helpful AI that writes {language} code, return only {language} code in a \
             markdown code block and nothing else. Always print the result at the end"
        )
    }

    pub fn build_prompt(&self, task: &str) -> String {
        format!("{}\n\nUser: {}\n\nAssistant:", self.system_instruction(), task)
    }

    /// Generate code for `task`, surfacing provider failures.
    pub async fn try_generate_code(&self, task: &str) -> LLMResult<String> {
        let request = GenerationRequest::new(
            self.build_prompt(task),
            self.config.model(),
            self.config.generation(),
        );
        let res = self.llm.generate(&request).await?;
        if let Some(tokens) = res.tokens {
            debug!(
                provider = self.llm.name(),
                prompt_tokens = tokens.prompt_tokens,
                completion_tokens = tokens.completion_tokens,
                "generation finished"
            );
        }
        Ok(self.extractor.extract(&res.generation).to_string())
    }

    /// Generate code for `task`.
    ///
    /// Never fails: any provider error is logged and an empty string comes back.
    /// Callers must read an empty result as "generation failed", not as code.
    pub async fn generate_code(&self, task: &str) -> String {
        match self.try_generate_code(task).await {
            Ok(code) => code,
            Err(e) => {
                error!(provider = self.llm.name(), error = %e, "error generating code");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{error::LLMError, GenerateResult};
    use futures::{FutureExt, future::BoxFuture};
    use std::sync::Mutex;

    struct Recording {
        reply: Option<&'static str>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl LLM for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn generate<'a>(&'a self, request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>> {
            self.seen.lock().unwrap().push(request.clone());
            let result = match self.reply {
                Some(text) => Ok(GenerateResult { generation: text.to_string(), tokens: None }),
                None => Err(LLMError::Unauthorized(401)),
            };
            async move { result }.boxed()
        }
    }

    fn generator(reply: Option<&'static str>) -> (LLMCodeGenerator, Arc<Recording>) {
        let llm = Arc::new(Recording { reply, seen: Mutex::new(Vec::new()) });
        let config = Arc::new(AgentConfig::new("hf_key", "Qwen/Qwen2.5-Coder-32B-Instruct", "http://localhost:3000"));
        (LLMCodeGenerator::new(llm.clone(), config), llm)
    }

    #[tokio::test]
    async fn prompt_wraps_task_and_uses_config() {
        let (generator, llm) = generator(Some("```python\nprint(factorial(5))\n```"));
        let code = generator.generate_code("factorial of 5").await;
        assert_eq!(code, "print(factorial(5))");

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert!(request.prompt.starts_with("You are a helpful AI that writes python code"));
        assert!(request.prompt.ends_with("User: factorial of 5\n\nAssistant:"));
        assert_eq!(request.model, "Qwen/Qwen2.5-Coder-32B-Instruct");
        assert_eq!(request.params.seed, 1337);
        assert_eq!(request.params.max_new_tokens, 512);
    }

    #[tokio::test]
    async fn provider_failure_becomes_empty_code() {
        let (generator, _) = generator(None);
        assert!(generator.try_generate_code("anything").await.is_err());
        assert_eq!(generator.generate_code("anything").await, "");
    }
}
