//! Tool system for the agent loop
//!
//! Four sandboxed operations (list, read, run, write) plus the dispatcher
//! that decodes model tool calls into them. Every operation resolves its
//! paths through the run's `ToolContext` - tools cannot escape the sandbox
//! root.

mod context;
mod error;
mod executor;
mod request;
mod traits;

pub mod builtin;

pub use context::{DEFAULT_READ_LIMIT_CHARS, DEFAULT_SCRIPT_TIMEOUT, SandboxLimits, SandboxRoot, ToolContext};
pub use error::{ToolError, ToolErrorKind};
pub use executor::{TRACE_TARGET, ToolExecutor};
pub use request::ToolRequest;
pub use traits::{Tool, ToolResult};
