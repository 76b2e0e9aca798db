//! Orchestration loop for toolloop
//!
//! The engine drives one run: task → model → tool calls → results back into
//! the transcript → repeat, until the model answers in plain text or the
//! iteration budget runs out.

mod config;
mod engine;
mod transcript;

pub use config::{DEFAULT_SYSTEM_PROMPT, LoopConfig};
pub use engine::{LoopEngine, LoopError, RunOutcome, RunReport};
pub use transcript::Transcript;
