//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Cannot access \"{path}\" as it is outside the permitted working directory")]
    OutOfBounds { path: PathBuf },

    #[error("\"{path}\" is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("File not found or is not a regular file: \"{path}\"")]
    NotAFile { path: PathBuf },

    #[error("File \"{path}\" not found")]
    NotFound { path: PathBuf },

    #[error("\"{path}\" is not a .{extension} file")]
    WrongFileType { path: PathBuf, extension: String },

    #[error("Script timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Could not access '{name}': {source}")]
    EntryAccess {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown function: {name}")]
    UnknownTool { name: String },

    #[error("Malformed arguments: {reason}")]
    MalformedRequest { reason: String },
}

/// Discriminant of a [`ToolError`], kept in tool results so callers can branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    OutOfBounds,
    NotADirectory,
    NotAFile,
    NotFound,
    WrongFileType,
    Timeout,
    EntryAccess,
    Io,
    UnknownTool,
    MalformedRequest,
}

impl ToolError {
    pub fn kind(&self) -> ToolErrorKind {
        match self {
            ToolError::OutOfBounds { .. } => ToolErrorKind::OutOfBounds,
            ToolError::NotADirectory { .. } => ToolErrorKind::NotADirectory,
            ToolError::NotAFile { .. } => ToolErrorKind::NotAFile,
            ToolError::NotFound { .. } => ToolErrorKind::NotFound,
            ToolError::WrongFileType { .. } => ToolErrorKind::WrongFileType,
            ToolError::Timeout { .. } => ToolErrorKind::Timeout,
            ToolError::EntryAccess { .. } => ToolErrorKind::EntryAccess,
            ToolError::Io(_) => ToolErrorKind::Io,
            ToolError::UnknownTool { .. } => ToolErrorKind::UnknownTool,
            ToolError::MalformedRequest { .. } => ToolErrorKind::MalformedRequest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = ToolError::OutOfBounds {
            path: PathBuf::from("../secrets"),
        };

        let msg = err.to_string();
        assert!(msg.contains("../secrets"));
        assert!(msg.contains("outside the permitted working directory"));
        assert_eq!(err.kind(), ToolErrorKind::OutOfBounds);
    }

    #[test]
    fn test_wrong_file_type_message() {
        let err = ToolError::WrongFileType {
            path: PathBuf::from("notes.txt"),
            extension: "py".to_string(),
        };

        assert_eq!(err.to_string(), "\"notes.txt\" is not a .py file");
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let err: ToolError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();

        assert_eq!(err.kind(), ToolErrorKind::Io);
        assert!(err.to_string().contains("denied"));
    }
}
