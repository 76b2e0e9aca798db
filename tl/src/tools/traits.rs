//! Tool trait and result envelope

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::context::ToolContext;
use super::error::{ToolError, ToolErrorKind};
use crate::llm::ToolDefinition;

/// A sandboxed operation the model can call
///
/// Implementations re-check containment themselves through
/// [`ToolContext::resolve`]; they never assume the dispatcher did it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the function name the model calls)
    const NAME: &'static str;

    /// Typed parameters decoded from the model's argument map
    type Params: DeserializeOwned + Send;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, params: Self::Params, ctx: &ToolContext) -> Result<String, ToolError>;

    /// Schema declaration handed to the model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(Self::NAME, self.description(), self.input_schema())
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    Success(String),
    Failure { kind: ToolErrorKind, message: String },
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self::Success(content.into())
    }

    /// Create an error result
    pub fn failure(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        debug!(?kind, "ToolResult::failure: called");
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Text handed back to the model, payload or error message
    pub fn content(&self) -> &str {
        match self {
            Self::Success(content) => content,
            Self::Failure { message, .. } => message,
        }
    }

    pub fn error_kind(&self) -> Option<ToolErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}
