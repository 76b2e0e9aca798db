//! read_file tool - read a file's text, capped at the configured character limit

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError};

/// Read a file's contents as text
pub struct ReadFileTool;

/// Parameters for `read_file`
#[derive(Debug, Clone, Deserialize)]
pub struct ReadFileParams {
    pub file_path: PathBuf,
}

#[async_trait]
impl Tool for ReadFileTool {
    const NAME: &'static str = "read_file";
    type Params = ReadFileParams;

    fn description(&self) -> &'static str {
        "Reads the content of a file, constrained to the working directory. Long files are truncated."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path of the file to read, relative to the working directory."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, params: ReadFileParams, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?params, "ReadFileTool::execute: called");
        let full_path = ctx.resolve(&params.file_path)?;

        let is_file = tokio::fs::metadata(&full_path).await.map(|m| m.is_file()).unwrap_or(false);
        if !is_file {
            debug!(?full_path, "ReadFileTool::execute: not a regular file");
            return Err(ToolError::NotAFile {
                path: params.file_path,
            });
        }

        let content = tokio::fs::read_to_string(&full_path).await?;
        let limit = ctx.limits().read_limit_chars;

        // Byte offset of the first character past the limit, if there is one
        match content.char_indices().nth(limit) {
            Some((cut, _)) => {
                debug!(%limit, "ReadFileTool::execute: truncating content");
                let mut truncated = content[..cut].to_string();
                truncated.push_str(&format!(
                    "\n[...File \"{}\" truncated at {} characters]",
                    full_path.display(),
                    limit
                ));
                Ok(truncated)
            }
            None => Ok(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{SandboxLimits, SandboxRoot};
    use std::fs;
    use tempfile::tempdir;

    fn context(dir: &std::path::Path) -> ToolContext {
        ToolContext::new(SandboxRoot::new(dir).unwrap())
    }

    fn params(path: &str) -> ReadFileParams {
        ReadFileParams {
            file_path: PathBuf::from(path),
        }
    }

    #[tokio::test]
    async fn test_read_file_basic() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.py"), "print('hi')\n").unwrap();
        let ctx = context(temp.path());

        let content = ReadFileTool.execute(params("main.py"), &ctx).await.unwrap();
        assert_eq!(content, "print('hi')\n");
    }

    #[tokio::test]
    async fn test_read_file_truncates_at_limit() {
        let temp = tempdir().unwrap();
        let source = "x".repeat(10_050);
        fs::write(temp.path().join("big.txt"), &source).unwrap();
        let ctx = context(temp.path());

        let content = ReadFileTool.execute(params("big.txt"), &ctx).await.unwrap();

        assert!(content.len() > 10_000);
        assert_eq!(&content[..10_000], &source[..10_000]);
        assert!(content.ends_with("truncated at 10000 characters]"));
        assert!(content.contains(&ctx.root().join("big.txt").display().to_string()));
    }

    #[tokio::test]
    async fn test_read_file_exact_limit_not_truncated() {
        let temp = tempdir().unwrap();
        let source = "y".repeat(10_000);
        fs::write(temp.path().join("edge.txt"), &source).unwrap();
        let ctx = context(temp.path());

        let content = ReadFileTool.execute(params("edge.txt"), &ctx).await.unwrap();
        assert_eq!(content, source);
    }

    #[tokio::test]
    async fn test_read_file_counts_characters_not_bytes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("utf8.txt"), "héllo wörld").unwrap();
        let limits = SandboxLimits {
            read_limit_chars: 5,
            ..Default::default()
        };
        let ctx = ToolContext::with_limits(SandboxRoot::new(temp.path()).unwrap(), limits);

        let content = ReadFileTool.execute(params("utf8.txt"), &ctx).await.unwrap();
        assert!(content.starts_with("héllo\n[...File"));
    }

    #[tokio::test]
    async fn test_read_file_not_a_file() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("pkg")).unwrap();
        let ctx = context(temp.path());

        for path in ["pkg", "missing.py"] {
            let err = ReadFileTool.execute(params(path), &ctx).await.unwrap_err();
            assert!(matches!(err, ToolError::NotAFile { .. }), "{path}: {err}");
        }
    }

    #[tokio::test]
    async fn test_read_file_outside_root() {
        let temp = tempdir().unwrap();
        let ctx = context(temp.path());

        let err = ReadFileTool.execute(params("/etc/passwd"), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::OutOfBounds { .. }));
    }

    #[tokio::test]
    async fn test_read_file_invalid_utf8_is_io_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        let ctx = context(temp.path());

        let err = ReadFileTool.execute(params("blob.bin"), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }
}
