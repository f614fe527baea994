//! Chat client struct, request building, and response checks.

use std::future::Future;
use std::time::Duration;

use crate::streaming::ReadOptions;
use crate::{AiError, Message};

use super::config::ChatClientConfig;

/// Upper bound for a non-streaming completion round trip.
pub(crate) const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client for the streaming chat endpoint and the completion API.
pub struct ChatClient {
    pub(crate) config: ChatClientConfig,
    pub(crate) http: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, AiError> {
        // No overall timeout: streamed replies are bounded by the idle timeout instead.
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    pub(crate) fn read_options(&self) -> ReadOptions {
        ReadOptions {
            idle_timeout: self.config.idle_timeout,
            limits: self.config.limits,
        }
    }

    /// Body for the streaming chat endpoint: just the conversation.
    pub(crate) fn build_stream_body(&self, messages: &[Message]) -> serde_json::Value {
        serde_json::json!({ "messages": messages })
    }

    /// Body for the completion API.
    pub(crate) fn build_completion_body(&self, messages: &[Message]) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
        })
    }

    /// Extract `choices[0].message.content` from a completion response.
    pub(crate) fn parse_completion(&self, json: &serde_json::Value) -> Result<String, AiError> {
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| AiError::ParseError("completion response has no message content".into()))
    }
}

/// Wait for response headers, giving up after `idle` when one is set.
pub(crate) async fn await_headers(
    request: impl Future<Output = reqwest::Result<reqwest::Response>>,
    idle: Option<Duration>,
) -> Result<reqwest::Response, AiError> {
    let response = match idle {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| AiError::Timeout)?,
        None => request.await,
    };
    response.map_err(transport_error)
}

pub(crate) fn transport_error(err: reqwest::Error) -> AiError {
    if err.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(err.to_string())
    }
}

/// Map a non-success response to an error; pass successful ones through.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(AiError::RateLimited);
    }
    if status == reqwest::StatusCode::PAYMENT_REQUIRED {
        return Err(AiError::PaymentRequired);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let text = text.chars().take(200).collect::<String>();
        return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
    }
    if status == reqwest::StatusCode::NO_CONTENT {
        return Err(AiError::ApiError("response has no body".into()));
    }
    Ok(response)
}
