//! write_file tool - write content to a file

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError};

/// Write content to a file, replacing whatever was there
pub struct WriteFileTool;

/// Parameters for `write_file`
#[derive(Debug, Clone, Deserialize)]
pub struct WriteFileParams {
    pub file_path: PathBuf,
    pub content: String,
}

#[async_trait]
impl Tool for WriteFileTool {
    const NAME: &'static str = "write_file";
    type Params = WriteFileParams;

    fn description(&self) -> &'static str {
        "Writes content to a file within the working directory, creating parent directories if needed and overwriting any existing file."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to write, relative to the working directory."
                },
                "content": {
                    "type": "string",
                    "description": "The full text content to write to the file."
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, params: WriteFileParams, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(file_path = ?params.file_path, content_len = %params.content.len(), "WriteFileTool::execute: called");
        let full_path = ctx.resolve(&params.file_path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        debug!("WriteFileTool::execute: parent directories ensured");

        tokio::fs::write(&full_path, &params.content).await?;

        let written = params.content.chars().count();
        debug!(%written, "WriteFileTool::execute: file written successfully");
        Ok(format!(
            "Successfully wrote to \"{}\" ({} characters written)",
            params.file_path.display(),
            written
        ))
    }
}
