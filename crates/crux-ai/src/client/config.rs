//! Chat client configuration.

use std::fmt;
use std::time::Duration;

use crate::streaming::FramerLimits;

pub const DEFAULT_COMPLETION_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Endpoints, credentials and stream limits for [`super::ChatClient`].
#[derive(Clone)]
pub struct ChatClientConfig {
    pub chat_url: String,
    pub chat_key: String,
    pub completion_url: String,
    pub completion_key: String,
    pub model: String,
    pub temperature: f64,
    pub connect_timeout: Duration,
    /// Longest gap between two chunks of a streamed reply.
    pub idle_timeout: Option<Duration>,
    pub limits: FramerLimits,
}

impl fmt::Debug for ChatClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClientConfig")
            .field("chat_url", &self.chat_url)
            .field("chat_key", &"[REDACTED]")
            .field("completion_url", &self.completion_url)
            .field("completion_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("connect_timeout", &self.connect_timeout)
            .field("idle_timeout", &self.idle_timeout)
            .field("limits", &self.limits)
            .finish()
    }
}

impl ChatClientConfig {
    /// Config for a chat endpoint. The same key is used for completions
    /// until [`Self::with_completion`] says otherwise.
    pub fn new(chat_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            chat_url: chat_url.into(),
            chat_key: api_key.clone(),
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            completion_key: api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Some(Duration::from_secs(60)),
            limits: FramerLimits::default(),
        }
    }

    pub fn with_completion(mut self, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.completion_url = url.into();
        self.completion_key = api_key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_max_buffer_bytes(mut self, max_buffer_bytes: usize) -> Self {
        self.limits = FramerLimits { max_buffer_bytes };
        self
    }
}
