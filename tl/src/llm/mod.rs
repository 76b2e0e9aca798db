//! LLM client module for toolloop
//!
//! Provider-agnostic request/response types, the `LlmClient` seam the agent
//! loop talks through, and the Gemini and Anthropic implementations.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod gemini;
mod http;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, Role, StopReason, TokenUsage,
    ToolCall, ToolDefinition,
};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "gemini" and "anthropic" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "anthropic" => {
            debug!("create_client: creating Anthropic client");
            Ok(Arc::new(AnthropicClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}
