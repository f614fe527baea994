//! HTTP client for the streaming chat endpoint and the completion API.
//!
//! Both endpoints take bearer-token auth. The chat endpoint answers with an
//! event stream that is framed by [`crate::streaming`]; the completion
//! endpoint answers with a single OpenAI-style JSON body.

mod api;
mod client;
mod config;

pub use client::ChatClient;
pub use config::{ChatClientConfig, DEFAULT_COMPLETION_URL, DEFAULT_MODEL};
