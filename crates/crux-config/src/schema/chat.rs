//! Endpoint configuration for the chat stream and the completion API.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GREETING: &str = "Hi! I'm CruxAI Assistant. Ask me anything about \
fact-checking, credibility analysis, or how to use the platform.";

/// Streaming chat endpoint (`POST {messages}` answered with `data:` frames).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
    /// First assistant message shown before the user types anything.
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:54321/functions/v1/chat".into(),
            api_key_env: "CRUX_API_KEY".into(),
            greeting: DEFAULT_GREETING.into(),
        }
    }
}

/// Non-streaming chat-completions endpoint used for claim verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key_env: String,
    pub model: String,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://ai.gateway.lovable.dev/v1/chat/completions".into(),
            api_key_env: "CRUX_API_KEY".into(),
            model: "google/gemini-2.5-flash".into(),
            temperature: 0.7,
        }
    }
}
