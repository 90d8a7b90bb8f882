use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "python";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 512;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_SEED: i32 = 1337;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which inference backend turns prompts into code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    HuggingFace,
    Ollama,
    OpenAI,
}

impl Provider {
    pub fn requires_credential(self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

impl std::str::FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Provider::HuggingFace),
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAI),
            other => Err(ConfigError::InvalidConfig(format!("unknown provider '{other}'"))),
        }
    }
}

/// Inference-provider credential. Never printed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Sampling parameters sent with every inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub seed: i32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            seed: DEFAULT_SEED,
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Agent configuration. Built once, then shared read-only (usually behind an `Arc`)
/// by the code generator and the remote executor.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    provider: Provider,
    #[serde(default)]
    api_key: Credential,
    model: String,
    server_url: String,
    #[serde(default)]
    llm_base_url: Option<String>,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    generation: GenerationParams,
}

impl AgentConfig {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        server_url: impl Into<String>,
    ) -> Self {
        Self {
            provider: Provider::default(),
            api_key: Credential::new(api_key),
            model: model.into(),
            server_url: server_url.into(),
            llm_base_url: None,
            language: default_language(),
            generation: GenerationParams::default(),
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Override the inference endpoint (self-hosted Ollama, OpenAI-compatible gateway, mock server).
    pub fn with_llm_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.llm_base_url = Some(base_url.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Read `CODE_AGENT_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AgentConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingConfig(key.to_string()))
        };

        let provider = match lookup("CODE_AGENT_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => Provider::default(),
        };
        let api_key = lookup("CODE_AGENT_API_KEY")
            .or_else(|| lookup("HF_TOKEN"))
            .unwrap_or_default();

        let mut config = AgentConfig::new(
            api_key,
            require("CODE_AGENT_MODEL")?,
            require("CODE_AGENT_SERVER_URL")?,
        )
        .with_provider(provider);
        if let Some(base_url) = lookup("CODE_AGENT_LLM_BASE_URL") {
            config = config.with_llm_base_url(base_url);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingConfig("model".into()));
        }
        let url = self.server_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingConfig("server_url".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidConfig(format!(
                "server_url must be an http(s) address, got '{url}'"
            )));
        }
        if self.provider.requires_credential() && self.api_key.is_empty() {
            return Err(ConfigError::MissingConfig("api_key".into()));
        }
        if self.language.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("language must not be empty".into()));
        }
        Ok(())
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn api_key(&self) -> &Credential {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn llm_base_url(&self) -> Option<&str> {
        self.llm_base_url.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn generation(&self) -> GenerationParams {
        self.generation
    }
}
