//! toolloop configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::llm::LlmError;
use crate::r#loop::DEFAULT_SYSTEM_PROMPT;
use crate::tools::{DEFAULT_READ_LIMIT_CHARS, SandboxLimits, SandboxRoot, ToolContext};

/// Main toolloop configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Sandbox root and tool limits
    pub sandbox: SandboxConfig,

    /// Orchestration loop settings
    pub agent: AgentConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        if self.agent.max_iterations == 0 {
            return Err(eyre::eyre!("agent.max-iterations must be at least 1"));
        }
        if self.sandbox.read_limit_chars == 0 {
            return Err(eyre::eyre!("sandbox.read-limit-chars must be at least 1"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .toolloop.yml
        let local_config = PathBuf::from(".toolloop.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/toolloop/toolloop.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("toolloop").join("toolloop.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Build the run's tool context, canonicalizing the sandbox root once
    pub fn tool_context(&self) -> Result<ToolContext> {
        let root = SandboxRoot::new(&self.sandbox.root)
            .context(format!("Invalid sandbox root {}", self.sandbox.root.display()))?;
        Ok(ToolContext::with_limits(root, self.sandbox.limits()))
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("gemini" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (empty means the provider's public endpoint)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Transport-level retries for transient HTTP failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash-001".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: String::new(),
            max_tokens: 8192,
            timeout_ms: 120_000,
            max_retries: 0,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env).map_err(|_| LlmError::MissingApiKey {
            env_var: self.api_key_env.clone(),
        })
    }

    /// Base URL, falling back to the provider's public endpoint
    pub fn resolved_base_url(&self) -> String {
        if !self.base_url.is_empty() {
            return self.base_url.trim_end_matches('/').to_string();
        }
        match self.provider.as_str() {
            "anthropic" => "https://api.anthropic.com".to_string(),
            _ => "https://generativelanguage.googleapis.com".to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Sandbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Directory all tool side effects are confined to
    pub root: PathBuf,

    /// Characters returned by read_file before truncation
    #[serde(rename = "read-limit-chars")]
    pub read_limit_chars: usize,

    /// Wall-clock limit for run_script in milliseconds
    #[serde(rename = "script-timeout-ms")]
    pub script_timeout_ms: u64,

    /// Interpreter used by run_script
    pub interpreter: String,

    /// Extension scripts must have, without the dot
    #[serde(rename = "script-extension")]
    pub script_extension: String,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            read_limit_chars: DEFAULT_READ_LIMIT_CHARS,
            script_timeout_ms: 30_000,
            interpreter: "python3".to_string(),
            script_extension: "py".to_string(),
        }
    }
}

impl SandboxConfig {
    pub fn limits(&self) -> SandboxLimits {
        SandboxLimits {
            read_limit_chars: self.read_limit_chars,
            script_timeout: Duration::from_millis(self.script_timeout_ms),
            interpreter: self.interpreter.clone(),
            script_extension: self.script_extension.trim_start_matches('.').to_string(),
        }
    }
}

/// Orchestration loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum model round trips before giving up
    #[serde(rename = "max-iterations")]
    pub max_iterations: u32,

    /// System instruction sent with every model call
    #[serde(rename = "system-prompt")]
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}
