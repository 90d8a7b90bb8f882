use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::config::AgentConfig;

pub mod types;
pub mod error;

use error::ExecutorError;
use types::{ExecutionResult, RunRequest};

pub const RUN_PATH: &str = "/run";
pub const HEALTH_PATH: &str = "/health";

/// Client for the remote code execution service.
#[derive(Debug, Clone)]
pub struct RemoteExecutor {
    client: reqwest::Client,
    config: Arc<AgentConfig>,
}

impl RemoteExecutor {
    pub fn new(config: Arc<AgentConfig>) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured client (timeouts, proxies, TLS roots).
    pub fn with_client(client: reqwest::Client, config: Arc<AgentConfig>) -> Self {
        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.server_url().trim_end_matches('/'), path)
    }

    pub fn endpoint(&self) -> String {
        self.url(RUN_PATH)
    }

    /// Submit `code` and return the service's JSON body, or why that failed.
    pub async fn try_execute(&self, code: &str, csv: Option<&str>) -> Result<ExecutionResult, ExecutorError> {
        let endpoint = self.endpoint();
        debug!(%endpoint, code_len = code.len(), with_csv = csv.is_some(), "submitting code");

        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&RunRequest { code, csv })
            .send()
            .await
            .map_err(ExecutorError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExecutorError::Status {
                status: status.as_u16(),
                url: endpoint,
            });
        }

        let body = response
            .json::<Map<String, Value>>()
            .await
            .map_err(ExecutorError::Decode)?;
        Ok(ExecutionResult::from(body))
    }

    /// Run `code` remotely.
    ///
    /// Never fails: transport errors and non-2xx answers come back as
    /// `{"error": <message>}`, the same shape callers get on success.
    pub async fn execute_code(&self, code: &str) -> ExecutionResult {
        self.execute(code, None).await
    }

    /// Like [`RemoteExecutor::execute_code`], with CSV data for the runner's `{{csv}}` placeholder.
    pub async fn execute_with_csv(&self, code: &str, csv: &str) -> ExecutionResult {
        self.execute(code, Some(csv)).await
    }

    async fn execute(&self, code: &str, csv: Option<&str>) -> ExecutionResult {
        match self.try_execute(code, csv).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "error communicating with the execution service");
                ExecutionResult::error(e.to_string())
            }
        }
    }

    /// `GET /health`. True when the service answers 2xx.
    pub async fn health(&self) -> Result<bool, ExecutorError> {
        let response = self
            .client
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .map_err(ExecutorError::Transport)?;
        Ok(response.status().is_success())
    }
}
