//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call carries the full transcript
///
/// The agent loop treats the model as an opaque request/response service.
/// Any failure surfaces as an `LlmError`, which ends the run.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
