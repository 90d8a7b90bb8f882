use anyhow::Context;
use code_agent::{AgentConfig, AgentOrchestrator, AgentRunner};

// Needs a code runner listening on CODE_AGENT_SERVER_URL and a HuggingFace token:
//
//   HF_TOKEN=hf_... \
//   CODE_AGENT_MODEL=Qwen/Qwen2.5-Coder-32B-Instruct \
//   CODE_AGENT_SERVER_URL=http://localhost:3000 \
//   cargo run --example python_agent
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config = AgentConfig::from_env()
        .context("set HF_TOKEN, CODE_AGENT_MODEL and CODE_AGENT_SERVER_URL (see https://huggingface.co/settings/tokens)")?;
    let agent = AgentOrchestrator::from_config(config)?;

    let task = "Write a Python function that calculates the factorial of a number and return the result for input 5";
    let result = agent.run_task(task).await;

    println!("Execution Result: {result}");
    Ok(())
}
