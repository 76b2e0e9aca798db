//! Built-in sandboxed operations

mod list_files;
mod read_file;
mod run_script;
mod write_file;

pub use list_files::{ListFilesParams, ListFilesTool};
pub use read_file::{ReadFileParams, ReadFileTool};
pub use run_script::{RunScriptParams, RunScriptTool};
pub use write_file::{WriteFileParams, WriteFileTool};
