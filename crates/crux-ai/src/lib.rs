//! AI engine for Crux.
//!
//! Provides:
//! - Incremental framing of streamed chat responses (`data: {...}` lines)
//! - An HTTP client for the chat stream and the completion API
//! - A conversation controller that grows the assistant turn in place
//! - Claim verification with result normalization and optional persistence
//! - Verdict explanation and evidence scoring on top of the completion API
//! - Crisis keyword screening of processed claims

pub mod client;
pub mod conversation;
pub mod streaming;
pub mod verify;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub use client::{ChatClient, ChatClientConfig};
pub use conversation::{Conversation, TurnOutcome, APOLOGY_MESSAGE};
pub use streaming::{EventFramer, FramerLimits, StreamEnd};
pub use verify::{ClaimRequest, ClaimVerifier, CredibilityAssessment, Verdict};

/// Progress of a streamed reply, delivered in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent<'a> {
    /// The transport accepted the request; deltas may follow.
    Opened,
    /// The next fragment of assistant text.
    Delta(&'a str),
}

#[async_trait]
pub trait AiClient: Send + Sync {
    /// Send `messages` and return the full assistant reply.
    async fn complete(&self, messages: &[Message]) -> Result<String, AiError>;

    /// Send `messages` and deliver the reply incrementally through `on_event`.
    ///
    /// `Opened` is delivered once before any delta. Transport failures are
    /// returned before `Opened`.
    async fn stream_chat(
        &self,
        messages: &[Message],
        cancel: &CancellationToken,
        on_event: &mut (dyn for<'a> FnMut(StreamEvent<'a>) + Send),
    ) -> Result<StreamEnd, AiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Payment required. Please add credits to your workspace.")]
    PaymentRequired,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Stream buffer exceeded {limit} bytes without a complete frame")]
    BufferOverflow { limit: usize },
    #[error("Timeout")]
    Timeout,
}

impl From<AiError> for crux_common::CruxError {
    fn from(err: AiError) -> Self {
        crux_common::CruxError::Ai(err.to_string())
    }
}
