//! ToolExecutor - dispatches model tool calls onto the sandboxed operations

use tracing::{debug, info};

use crate::llm::{ToolCall, ToolDefinition};

use super::builtin::{ListFilesTool, ReadFileTool, RunScriptTool, WriteFileTool};
use super::{Tool, ToolContext, ToolError, ToolRequest, ToolResult};

/// Tracing target for the one-line per-call trace shown to the user
pub const TRACE_TARGET: &str = "toolloop::trace";

/// Dispatches tool calls for one run
///
/// Owns the run's [`ToolContext`]; the sandbox root inside it is the only
/// root any operation ever sees.
pub struct ToolExecutor {
    ctx: ToolContext,
    verbose: bool,
}

impl ToolExecutor {
    pub fn new(ctx: ToolContext) -> Self {
        debug!(?ctx, "ToolExecutor::new: called");
        Self { ctx, verbose: false }
    }

    /// Include full arguments in the call trace
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get tool definitions for the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        debug!("ToolExecutor::definitions: called");
        vec![
            ListFilesTool.definition(),
            ReadFileTool.definition(),
            RunScriptTool.definition(),
            WriteFileTool.definition(),
        ]
    }

    /// Execute one tool call, converting every failure into a `ToolResult`
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        debug!(tool_name = %call.name, tool_id = %call.id, "ToolExecutor::dispatch: called");
        self.trace(call);

        let request = match ToolRequest::decode(&call.name, &call.input) {
            Ok(request) => request,
            Err(e @ ToolError::UnknownTool { .. }) => {
                debug!("ToolExecutor::dispatch: unknown tool");
                return ToolResult::failure(e.kind(), e.to_string());
            }
            Err(e) => {
                debug!(%e, "ToolExecutor::dispatch: malformed request");
                return ToolResult::failure(e.kind(), format!("Error calling {}: {}", call.name, e));
            }
        };

        let outcome = match request {
            ToolRequest::ListFiles(params) => ListFilesTool.execute(params, &self.ctx).await,
            ToolRequest::ReadFile(params) => ReadFileTool.execute(params, &self.ctx).await,
            ToolRequest::RunScript(params) => RunScriptTool.execute(params, &self.ctx).await,
            ToolRequest::WriteFile(params) => WriteFileTool.execute(params, &self.ctx).await,
        };

        match outcome {
            Ok(payload) => {
                debug!(payload_len = %payload.len(), "ToolExecutor::dispatch: tool succeeded");
                ToolResult::success(payload)
            }
            Err(e) => {
                debug!(%e, "ToolExecutor::dispatch: tool failed");
                ToolResult::failure(e.kind(), format!("Error calling {}: {}", call.name, e))
            }
        }
    }

    fn trace(&self, call: &ToolCall) {
        if self.verbose {
            info!(target: TRACE_TARGET, "Calling function: {}({})", call.name, call.input);
        } else {
            info!(target: TRACE_TARGET, " - Calling function: {}", call.name);
        }
    }
}
