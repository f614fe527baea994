//! Conversation types.

use crate::streaming::StreamEnd;
use crate::Message;

/// Shown in place of a reply when a turn fails.
pub const APOLOGY_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Receives the full message list every time it changes.
pub type Observer = Box<dyn Fn(&[Message]) + Send + Sync>;

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Assistant text delivered during the turn (possibly partial when cancelled).
    pub reply: String,
    pub end: StreamEnd,
}

/// Accumulates deltas for the in-flight assistant reply.
#[derive(Debug, Default)]
pub(crate) struct AssistantTurn {
    content: String,
}

impl AssistantTurn {
    pub(crate) fn push(&mut self, delta: &str) {
        self.content.push_str(delta);
    }

    pub(crate) fn content(&self) -> &str {
        &self.content
    }

    pub(crate) fn into_content(self) -> String {
        self.content
    }
}
