//! Loop configuration types

use tracing::debug;

use crate::config::Config;

/// Default system instruction for the agent
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI coding agent.

When a user asks a question or makes a request, make a function call plan. You can perform the following operations:

- List files and directories
- Read file contents
- Execute Python files with optional arguments
- Write or overwrite files

All paths you provide should be relative to the working directory. You do not need to specify the working directory in your function calls as it is automatically injected for security reasons.

When you are done, reply with your final answer as plain text and no function calls.";

/// Settings for one run of the orchestration loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Maximum model round trips before the run gives up
    pub max_iterations: u32,

    /// System instruction sent with every model call
    pub system_prompt: String,

    /// Max tokens per model response
    pub max_tokens: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 8192,
        }
    }
}

impl From<&Config> for LoopConfig {
    fn from(config: &Config) -> Self {
        debug!(max_iterations = %config.agent.max_iterations, "LoopConfig::from: called");
        Self {
            max_iterations: config.agent.max_iterations,
            system_prompt: config.agent.system_prompt.clone(),
            max_tokens: config.llm.max_tokens,
        }
    }
}
