//! Async chat turn for Conversation.

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::streaming::StreamEnd;
use crate::{AiClient, AiError, Message, StreamEvent};

use super::manager::Conversation;
use super::types::TurnOutcome;

impl Conversation {
    /// Append the user's message and stream the assistant's reply.
    ///
    /// The whole log is sent. On failure the error is returned after the log
    /// has been updated: any partial reply stays as it was and an apology is
    /// appended as a separate message. Cancellation keeps the partial reply
    /// without an apology.
    pub async fn send(
        &mut self,
        client: &dyn AiClient,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, AiError> {
        if input.trim().is_empty() {
            return Err(AiError::InvalidRequest("message is empty".into()));
        }

        self.push(Message::user(input));
        let history = self.messages.clone();

        debug!(
            conversation = %self.id,
            messages = history.len(),
            "sending chat turn"
        );

        let result = {
            let mut on_event = |event: StreamEvent<'_>| match event {
                StreamEvent::Opened => self.begin_turn(),
                StreamEvent::Delta(delta) => self.apply_delta(delta),
            };
            client.stream_chat(&history, cancel, &mut on_event).await
        };

        match result {
            Ok(end) => {
                let reply = self.commit_turn().unwrap_or_default();
                if end == StreamEnd::Cancelled {
                    debug!(conversation = %self.id, chars = reply.len(), "chat turn cancelled");
                }
                Ok(TurnOutcome { reply, end })
            }
            Err(e) => {
                warn!(conversation = %self.id, error = %e, "chat turn failed");
                self.commit_turn();
                self.push_apology();
                Err(e)
            }
        }
    }
}
