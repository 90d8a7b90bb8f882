use std::fmt;

use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

/// Body of `POST /run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest<'a> {
    pub code: &'a str,
    /// Substituted for the runner's `{{csv}}` placeholder. Omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<&'a str>,
}

/// Whatever the execution service answered, or a locally built `{"error": ..}`.
///
/// A JSON object that keeps the service's key order. The service's schema is not checked: a success
/// body is passed through untouched, so a service-level failure reported inside it
/// is only visible to callers who look.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionResult(Map<String, Value>);

impl ExecutionResult {
    pub const ERROR_KEY: &'static str = "error";

    pub fn error(message: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(Self::ERROR_KEY.to_string(), Value::String(message.into()));
        Self(map)
    }

    /// True when an `error` key carries a non-null value.
    pub fn is_error(&self) -> bool {
        self.0.get(Self::ERROR_KEY).is_some_and(|v| !v.is_null())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.0.get(Self::ERROR_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Typed view of the runner's `{"res": {"status", "output"}}` envelope, if present.
    pub fn runner_report(&self) -> Option<RunnerReport> {
        self.0
            .get("res")
            .and_then(|res| serde_json::from_value(res.clone()).ok())
    }
}

impl From<Map<String, Value>> for ExecutionResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerStatus {
    Ok,
    Error,
}

/// What the sandboxed runner reports for one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerReport {
    pub status: RunnerStatus,
    #[serde(default)]
    pub output: Option<String>,
}

impl RunnerReport {
    pub fn succeeded(&self) -> bool {
        self.status == RunnerStatus::Ok
    }
}
