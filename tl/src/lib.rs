//! toolloop - sandboxed tool-calling agent loop
//!
//! A language model works on a task by calling four file-oriented tools
//! (list, read, run, write) confined to a sandbox directory. The loop feeds
//! every tool result back to the model until it answers in plain text or
//! the iteration budget runs out.
//!
//! # Modules
//!
//! - [`tools`] - Sandboxed operations and the tool dispatcher
//! - [`llm`] - LLM client trait with Gemini and Anthropic implementations
//! - [`r#loop`] - Orchestration loop
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod tools;

// Note: 'loop' is a reserved keyword, so we use r#loop
#[path = "loop/mod.rs"]
pub mod r#loop;

// Re-export commonly used types
pub use config::{AgentConfig, Config, LlmConfig, SandboxConfig};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use r#loop::{LoopConfig, LoopEngine, LoopError, RunOutcome, RunReport, Transcript};
pub use tools::{SandboxLimits, SandboxRoot, ToolContext, ToolError, ToolErrorKind, ToolExecutor, ToolResult};
