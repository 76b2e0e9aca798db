//! list_files tool - describe the direct children of a directory

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::tools::{Tool, ToolContext, ToolError};

/// List files and directories with their sizes
pub struct ListFilesTool;

/// Parameters for `list_files`
#[derive(Debug, Clone, Deserialize)]
pub struct ListFilesParams {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ListFilesParams {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

/// Render a boolean the way listings have always shown it to the model
fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[async_trait]
impl Tool for ListFilesTool {
    const NAME: &'static str = "list_files";
    type Params = ListFilesParams;

    fn description(&self) -> &'static str {
        "Lists files in the specified directory along with their sizes, constrained to the working directory."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "The directory to list files from, relative to the working directory. If not provided, lists files in the working directory itself."
                }
            }
        })
    }

    async fn execute(&self, params: ListFilesParams, ctx: &ToolContext) -> Result<String, ToolError> {
        debug!(?params, "ListFilesTool::execute: called");
        let full_path = ctx.resolve(&params.directory)?;

        let is_dir = tokio::fs::metadata(&full_path).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            debug!(?full_path, "ListFilesTool::execute: not a directory");
            return Err(ToolError::NotADirectory {
                path: params.directory,
            });
        }

        let mut dir = tokio::fs::read_dir(&full_path).await?;
        let mut lines = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            // Follows symlinks, so a link reports its target's size and kind
            let metadata = tokio::fs::metadata(entry.path())
                .await
                .map_err(|source| ToolError::EntryAccess {
                    name: name.clone(),
                    source,
                })?;

            lines.push(format!(
                "- {}: file_size={} bytes, is_dir={}",
                name,
                metadata.len(),
                flag(metadata.is_dir())
            ));
        }

        debug!(entries_count = %lines.len(), "ListFilesTool::execute: entries collected");
        Ok(lines.join("\n"))
    }
}
