//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// toolloop - sandboxed tool-calling agent
#[derive(Debug, Parser)]
#[command(
    name = "tl",
    about = "Ask a model to carry out a file-oriented task inside a sandbox directory",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/toolloop/logs/toolloop.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, help = "Print the prompt, token counts and full tool arguments")]
    pub verbose: bool,

    /// Sandbox root, overrides sandbox.root from config
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Maximum model round trips, overrides agent.max-iterations from config
    #[arg(short, long, value_name = "N")]
    pub max_iterations: Option<u32>,

    /// Task for the agent; words are joined with spaces
    #[arg(value_name = "TASK")]
    pub task: Vec<String>,
}

impl Cli {
    /// The task text, or None when no words were given
    pub fn prompt(&self) -> Option<String> {
        if self.task.is_empty() {
            return None;
        }
        Some(self.task.join(" "))
    }
}
