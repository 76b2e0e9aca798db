//! ToolRequest - typed decoding of model-issued tool calls

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::builtin::{
    ListFilesParams, ListFilesTool, ReadFileParams, ReadFileTool, RunScriptParams, RunScriptTool, WriteFileParams,
    WriteFileTool,
};
use super::{Tool, ToolError};

/// Argument key the model is never allowed to control
const WORKING_DIRECTORY_KEY: &str = "working_directory";

/// A decoded tool call, one variant per sandboxed operation
#[derive(Debug, Clone)]
pub enum ToolRequest {
    ListFiles(ListFilesParams),
    ReadFile(ReadFileParams),
    RunScript(RunScriptParams),
    WriteFile(WriteFileParams),
}

impl ToolRequest {
    /// Decode a tool name and its raw argument map
    ///
    /// Unknown names yield `UnknownTool`; arguments that do not fit the
    /// operation's parameters yield `MalformedRequest`.
    pub fn decode(name: &str, arguments: &Value) -> Result<Self, ToolError> {
        debug!(%name, "ToolRequest::decode: called");
        let arguments = sanitize(arguments);

        match name {
            n if n == ListFilesTool::NAME => Ok(Self::ListFiles(parse(arguments)?)),
            n if n == ReadFileTool::NAME => Ok(Self::ReadFile(parse(arguments)?)),
            n if n == RunScriptTool::NAME => Ok(Self::RunScript(parse(arguments)?)),
            n if n == WriteFileTool::NAME => Ok(Self::WriteFile(parse(arguments)?)),
            _ => {
                debug!(%name, "ToolRequest::decode: unknown tool");
                Err(ToolError::UnknownTool { name: name.to_string() })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ListFiles(_) => ListFilesTool::NAME,
            Self::ReadFile(_) => ReadFileTool::NAME,
            Self::RunScript(_) => RunScriptTool::NAME,
            Self::WriteFile(_) => WriteFileTool::NAME,
        }
    }
}

/// Treat missing arguments as an empty map and drop any working directory override
fn sanitize(arguments: &Value) -> Value {
    match arguments {
        Value::Null => Value::Object(Default::default()),
        Value::Object(map) => {
            let mut map = map.clone();
            if map.remove(WORKING_DIRECTORY_KEY).is_some() {
                debug!("sanitize: ignoring model-supplied working_directory");
            }
            Value::Object(map)
        }
        other => other.clone(),
    }
}

fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::MalformedRequest { reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_decode_each_tool() {
        let cases = [
            ("list_files", json!({})),
            ("read_file", json!({"file_path": "main.py"})),
            ("run_script", json!({"file_path": "main.py", "args": ["1"]})),
            ("write_file", json!({"file_path": "a.txt", "content": "x"})),
        ];

        for (name, args) in cases {
            let request = ToolRequest::decode(name, &args).unwrap();
            assert_eq!(request.name(), name);
        }
    }

    #[test]
    fn test_decode_list_files_defaults_directory() {
        match ToolRequest::decode("list_files", &Value::Null).unwrap() {
            ToolRequest::ListFiles(params) => assert_eq!(params.directory, PathBuf::from(".")),
            other => panic!("Expected ListFiles, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_run_script_defaults_args() {
        match ToolRequest::decode("run_script", &json!({"file_path": "main.py"})).unwrap() {
            ToolRequest::RunScript(params) => assert!(params.args.is_empty()),
            other => panic!("Expected RunScript, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_ignores_working_directory() {
        let args = json!({"directory": "pkg", "working_directory": "/"});
        match ToolRequest::decode("list_files", &args).unwrap() {
            ToolRequest::ListFiles(params) => assert_eq!(params.directory, PathBuf::from("pkg")),
            other => panic!("Expected ListFiles, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_unknown_tool() {
        let err = ToolRequest::decode("delete_everything", &json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool { ref name } if name == "delete_everything"));
    }

    #[test]
    fn test_decode_malformed_arguments() {
        let missing = ToolRequest::decode("write_file", &json!({"file_path": "a.txt"})).unwrap_err();
        assert!(matches!(missing, ToolError::MalformedRequest { .. }));

        let wrong_type = ToolRequest::decode("run_script", &json!({"file_path": "a.py", "args": "1 2"})).unwrap_err();
        assert!(matches!(wrong_type, ToolError::MalformedRequest { .. }));

        let not_object = ToolRequest::decode("read_file", &json!("main.py")).unwrap_err();
        assert!(matches!(not_object, ToolError::MalformedRequest { .. }));
    }
}
