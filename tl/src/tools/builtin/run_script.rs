//! run_script tool - run a script from the sandbox under the configured interpreter

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError};

/// Execute a script with optional arguments
pub struct RunScriptTool;

/// Parameters for `run_script`
#[derive(Debug, Clone, Deserialize)]
pub struct RunScriptParams {
    pub file_path: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[async_trait]
impl Tool for RunScriptTool {
    const NAME: &'static str = "run_script";
    type Params = RunScriptParams;

    fn description(&self) -> &'static str {
        "Executes a Python file within the working directory and returns its output, with optional command-line arguments."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the Python file to execute, relative to the working directory."
                },
                "args": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Optional command-line arguments passed to the script."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, params: RunScriptParams, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?params, "RunScriptTool::execute: called");
        let full_path = ctx.resolve(&params.file_path)?;
        let limits = ctx.limits();

        let is_file = tokio::fs::metadata(&full_path).await.map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            debug!(?full_path, "RunScriptTool::execute: script not found");
            return Err(ToolError::NotFound {
                path: params.file_path,
            });
        }

        let extension_ok = full_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(limits.script_extension.as_str()));
        if !extension_ok {
            debug!(?full_path, "RunScriptTool::execute: wrong extension");
            return Err(ToolError::WrongFileType {
                path: params.file_path,
                extension: limits.script_extension.clone(),
            });
        }

        debug!(interpreter = %limits.interpreter, "RunScriptTool::execute: spawning script");
        let output = tokio::process::Command::new(&limits.interpreter)
            .arg(&full_path)
            .args(&params.args)
            .current_dir(ctx.root())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(limits.script_timeout, output).await {
            Ok(result) => result?,
            Err(_) => {
                debug!("RunScriptTool::execute: script timed out");
                return Err(ToolError::Timeout {
                    timeout_ms: limits.script_timeout.as_millis() as u64,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(status = ?output.status, "RunScriptTool::execute: script completed");

        Ok(format_report(stdout.trim(), stderr.trim(), output.status))
    }
}

/// Build the report, omitting empty sections and a zero exit code
fn format_report(stdout: &str, stderr: &str, status: ExitStatus) -> String {
    let mut sections = Vec::new();

    if !stdout.is_empty() {
        sections.push(format!("STDOUT:\n{}", stdout));
    }
    if !stderr.is_empty() {
        sections.push(format!("STDERR:\n{}", stderr));
    }
    if !status.success() {
        sections.push(exit_line(status));
    }

    if sections.is_empty() {
        "No output produced.".to_string()
    } else {
        sections.join("\n")
    }
}

fn exit_line(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("Process exited with code {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("Process terminated by signal {}", signal);
        }
    }

    "Process exited abnormally".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{SandboxLimits, SandboxRoot};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Scripts in these tests are shell scripts so they run without Python installed
    fn sh_context(dir: &std::path::Path, timeout: Duration) -> ToolContext {
        let limits = SandboxLimits {
            script_timeout: timeout,
            interpreter: "sh".to_string(),
            script_extension: "sh".to_string(),
            ..Default::default()
        };
        ToolContext::with_limits(SandboxRoot::new(dir).unwrap(), limits)
    }

    fn params(path: &str, args: &[&str]) -> RunScriptParams {
        RunScriptParams {
            file_path: PathBuf::from(path),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_run_script_stdout_and_args() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("echo.sh"), "echo \"got $1 $2\"\n").unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let report = RunScriptTool
            .execute(params("echo.sh", &["3", "+ 5"]), &ctx)
            .await
            .unwrap();

        assert_eq!(report, "STDOUT:\ngot 3 + 5");
    }

    #[tokio::test]
    async fn test_run_script_runs_in_root() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("pkg")).unwrap();
        fs::write(temp.path().join("pkg/where.sh"), "pwd\n").unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let report = RunScriptTool.execute(params("pkg/where.sh", &[]), &ctx).await.unwrap();

        assert_eq!(report, format!("STDOUT:\n{}", ctx.root().display()));
    }

    #[tokio::test]
    async fn test_run_script_stderr_and_exit_code() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("fail.sh"), "echo boom >&2\nexit 3\n").unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let report = RunScriptTool.execute(params("fail.sh", &[]), &ctx).await.unwrap();

        assert_eq!(report, "STDERR:\nboom\nProcess exited with code 3");
    }

    #[tokio::test]
    async fn test_run_script_no_output() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("quiet.sh"), "true\n").unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let report = RunScriptTool.execute(params("quiet.sh", &[]), &ctx).await.unwrap();

        assert_eq!(report, "No output produced.");
    }

    #[tokio::test]
    async fn test_run_script_timeout() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("slow.sh"), "exec sleep 30\n").unwrap();
        let ctx = sh_context(temp.path(), Duration::from_millis(300));

        let started = std::time::Instant::now();
        let err = RunScriptTool.execute(params("slow.sh", &[]), &ctx).await.unwrap_err();

        assert!(matches!(err, ToolError::Timeout { timeout_ms: 300 }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_run_script_not_found() {
        let temp = tempdir().unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let err = RunScriptTool.execute(params("missing.sh", &[]), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_script_wrong_extension() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), "echo hi\n").unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let err = RunScriptTool.execute(params("notes.txt", &[]), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::WrongFileType { .. }));
    }

    #[tokio::test]
    async fn test_run_script_outside_root() {
        let temp = tempdir().unwrap();
        let ctx = sh_context(temp.path(), Duration::from_secs(10));

        let err = RunScriptTool.execute(params("../evil.sh", &[]), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::OutOfBounds { .. }));
    }

    #[tokio::test]
    async fn test_run_script_missing_interpreter() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.py"), "print(1)\n").unwrap();
        let limits = SandboxLimits {
            interpreter: "definitely-not-an-interpreter".to_string(),
            ..Default::default()
        };
        let ctx = ToolContext::with_limits(SandboxRoot::new(temp.path()).unwrap(), limits);

        let err = RunScriptTool.execute(params("main.py", &[]), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }
}
