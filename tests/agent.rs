use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use code_agent::{AgentConfig, AgentOrchestrator, AgentRunner, Provider};
use code_agent::llm::{
    error::LLMError,
    traits::LLM,
    GenerateResult,
    GenerationRequest,
    LLMResult,
};
use futures::{FutureExt, future::BoxFuture};
use mockito::Matcher;
use serde_json::json;

/// Answers every prompt with the same text, or fails every call.
struct ScriptedLLM {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedLLM {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Some(text.to_string()), calls: AtomicUsize::new(0) })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self { reply: None, calls: AtomicUsize::new(0) })
    }
}

impl LLM for ScriptedLLM {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate<'a>(&'a self, _request: &'a GenerationRequest) -> BoxFuture<'a, LLMResult<GenerateResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.reply {
            Some(text) => Ok(GenerateResult { generation: text.clone(), tokens: None }),
            None => Err(LLMError::RateLimitExceeded("quota exhausted".into())),
        };
        async move { result }.boxed()
    }
}

fn config(server_url: &str) -> Arc<AgentConfig> {
    Arc::new(AgentConfig::new("hf_key", "Qwen/Qwen2.5-Coder-32B-Instruct", server_url))
}

const FACTORIAL_TASK: &str =
    "Write a Python function that calculates the factorial of a number and return the result for input 5";

#[tokio::test]
async fn runs_generated_code_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/run")
        .match_body(Matcher::Json(json!({ "code": "print(factorial(5))" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"output": "120"}"#)
        .create_async()
        .await;

    let llm = ScriptedLLM::replying("```python\nprint(factorial(5))\n```\n");
    let agent = AgentOrchestrator::with_llm(llm.clone(), config(&server.url()));

    let result = agent.run_task(FACTORIAL_TASK).await;

    mock.assert_async().await;
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "output": "120" }));
}

#[tokio::test]
async fn failed_generation_still_reaches_the_executor() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/run")
        .match_body(Matcher::Json(json!({ "code": "" })))
        .with_status(200)
        .with_body(r#"{"output": ""}"#)
        .expect(1)
        .create_async()
        .await;

    let agent = AgentOrchestrator::with_llm(ScriptedLLM::failing(), config(&server.url()));

    assert_eq!(agent.generator().generate_code(FACTORIAL_TASK).await, "");
    let result = agent.run_task(FACTORIAL_TASK).await;

    mock.assert_async().await;
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "output": "" }));
}

#[tokio::test]
async fn unreachable_executor_yields_error_result() {
    let llm = ScriptedLLM::replying("```python\nprint(factorial(5))\n```");
    let agent = AgentOrchestrator::with_llm(llm, config("http://127.0.0.1:1"));

    let result = agent.run_task(FACTORIAL_TASK).await;

    assert!(result.is_error());
    assert!(!result.error_message().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn runs_repeatedly_without_shared_state() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/run")
        .with_status(200)
        .with_body(r#"{"output": "120"}"#)
        .expect(2)
        .create_async()
        .await;

    let llm = ScriptedLLM::replying("```python\nprint(factorial(5))\n```");
    let agent = AgentOrchestrator::with_llm(llm.clone(), config(&server.url()));

    let first = agent.run_task(FACTORIAL_TASK).await;
    let second = agent.run_task(FACTORIAL_TASK).await;

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn huggingface_provider_drives_the_pipeline() {
    let mut hf = mockito::Server::new_async().await;
    let hf_mock = hf
        .mock("POST", "/models/Qwen/Qwen2.5-Coder-32B-Instruct")
        .match_header("authorization", "Bearer hf_key")
        .match_body(Matcher::PartialJson(json!({
            "parameters": { "seed": 1337, "max_new_tokens": 512, "do_sample": true }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"generated_text": "```python\nprint(factorial(5))\n```"}]"#)
        .create_async()
        .await;

    let mut runner = mockito::Server::new_async().await;
    let run_mock = runner
        .mock("POST", "/run")
        .match_body(Matcher::Json(json!({ "code": "print(factorial(5))" })))
        .with_status(200)
        .with_body(r#"{"output": "120"}"#)
        .create_async()
        .await;

    let config = AgentConfig::new("hf_key", "Qwen/Qwen2.5-Coder-32B-Instruct", runner.url())
        .with_provider(Provider::HuggingFace)
        .with_llm_base_url(hf.url());
    let agent = AgentOrchestrator::from_config(config).unwrap();

    let result = agent.run_task(FACTORIAL_TASK).await;

    hf_mock.assert_async().await;
    run_mock.assert_async().await;
    assert_eq!(result.get("output"), Some(&json!("120")));
}

#[tokio::test]
async fn rejected_credential_sends_empty_code() {
    let mut hf = mockito::Server::new_async().await;
    let _hf_mock = hf
        .mock("POST", Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "Invalid credentials in Authorization header"}"#)
        .create_async()
        .await;

    let mut runner = mockito::Server::new_async().await;
    let run_mock = runner
        .mock("POST", "/run")
        .match_body(Matcher::Json(json!({ "code": "" })))
        .with_status(200)
        .with_body(r#"{"output": ""}"#)
        .create_async()
        .await;

    let config = AgentConfig::new("hf_wrong", "bigcode/starcoder2-15b", runner.url())
        .with_llm_base_url(hf.url());
    let agent = AgentOrchestrator::from_config(config).unwrap();

    let err = agent.generator().try_generate_code("sum 1..10").await.unwrap_err();
    assert!(matches!(err, LLMError::Unauthorized(401)));

    agent.run_task("sum 1..10").await;
    run_mock.assert_async().await;
}

#[test]
fn invalid_config_is_rejected_before_wiring() {
    let config = AgentConfig::new("hf_key", "", "http://localhost:3000");
    assert!(AgentOrchestrator::from_config(config).is_err());
}
