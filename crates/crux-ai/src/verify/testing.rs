//! Completion stub shared by the verify tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::streaming::StreamEnd;
use crate::{AiClient, AiError, Message, StreamEvent};

/// Answers every completion with the same reply and records what was sent.
pub(crate) struct FixedReply {
    reply: Option<&'static str>,
    pub(crate) sent: Mutex<Vec<Vec<Message>>>,
}

impl FixedReply {
    pub(crate) fn new(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn rate_limited() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            sent: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AiClient for FixedReply {
    async fn complete(&self, messages: &[Message]) -> Result<String, AiError> {
        self.sent.lock().unwrap().push(messages.to_vec());
        self.reply.map(String::from).ok_or(AiError::RateLimited)
    }

    async fn stream_chat(
        &self,
        _messages: &[Message],
        _cancel: &CancellationToken,
        _on_event: &mut (dyn for<'a> FnMut(StreamEvent<'a>) + Send),
    ) -> Result<StreamEnd, AiError> {
        Err(AiError::InvalidRequest("not used".into()))
    }
}
