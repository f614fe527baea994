//! Conversation struct and message-log management.

use crux_common::ConversationId;
use tracing::debug;

use crate::Message;

use super::types::{AssistantTurn, Observer, APOLOGY_MESSAGE};

/// An ordered chat log plus the assistant turn currently streaming in.
pub struct Conversation {
    pub(super) id: ConversationId,
    /// Committed messages, oldest first. Never modified once pushed.
    pub(super) messages: Vec<Message>,
    /// Reply being streamed; presented after `messages`.
    pub(super) active: Option<AssistantTurn>,
    pub(super) observer: Option<Observer>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: ConversationId::new(),
            messages: Vec::new(),
            active: None,
            observer: None,
        }
    }

    /// Seed the log with an assistant greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(greeting));
        self
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Committed messages only.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// What a UI should render: committed messages plus the in-flight reply.
    pub fn snapshot(&self) -> Vec<Message> {
        let mut view = self.messages.clone();
        if let Some(turn) = &self.active {
            view.push(Message::assistant(turn.content()));
        }
        view
    }

    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Drop every message, including the greeting.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.active = None;
        self.publish();
    }

    pub(super) fn publish(&self) {
        if let Some(observer) = &self.observer {
            observer(&self.snapshot());
        }
    }

    pub(super) fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.publish();
    }

    /// Start the placeholder reply once the transport is open.
    pub(super) fn begin_turn(&mut self) {
        self.active = Some(AssistantTurn::default());
        self.publish();
    }

    /// Grow the in-flight reply; the presented last message is overwritten.
    pub(super) fn apply_delta(&mut self, delta: &str) {
        match self.active.as_mut() {
            Some(turn) => turn.push(delta),
            None => {
                debug!(conversation = %self.id, "delta before stream opened, starting turn");
                let mut turn = AssistantTurn::default();
                turn.push(delta);
                self.active = Some(turn);
            }
        }
        self.publish();
    }

    /// Move the in-flight reply into the log. `None` if no turn was started.
    pub(super) fn commit_turn(&mut self) -> Option<String> {
        let content = self.active.take()?.into_content();
        self.messages.push(Message::assistant(content.clone()));
        Some(content)
    }

    pub(super) fn push_apology(&mut self) {
        self.push(Message::assistant(APOLOGY_MESSAGE));
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
