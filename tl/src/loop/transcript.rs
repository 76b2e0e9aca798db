//! Transcript - the append-only record of one run

use tracing::debug;

use crate::llm::{Message, Role};

/// Ordered record of user input, model replies and tool results
///
/// Turns can only be appended. The whole transcript is resent on every
/// model call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    turns: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with the user's task as its only turn
    pub fn new(task: impl Into<String>) -> Self {
        debug!("Transcript::new: called");
        Self {
            turns: vec![Message::user(task)],
        }
    }

    pub fn push(&mut self, turn: Message) {
        debug!(role = ?turn.role, len = %self.turns.len(), "Transcript::push: called");
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Roles in order, handy for checking turn structure
    pub fn roles(&self) -> Vec<Role> {
        self.turns.iter().map(|t| t.role).collect()
    }
}
