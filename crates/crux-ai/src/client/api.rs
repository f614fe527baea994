//! AiClient trait implementation for ChatClient (completion + streaming).

use async_trait::async_trait;
use crux_common::new_correlation_id;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::streaming::{read_stream, StreamEnd};
use crate::{AiClient, AiError, Message, StreamEvent};

use super::client::{await_headers, check_status, transport_error, ChatClient, COMPLETION_TIMEOUT};

#[async_trait]
impl AiClient for ChatClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, AiError> {
        let body = self.build_completion_body(messages);
        let request_id = new_correlation_id();

        debug!(%request_id, model = %self.config.model, "completion request");

        let response = self
            .http
            .post(&self.config.completion_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.completion_key))
            .header(CONTENT_TYPE, "application/json")
            .timeout(COMPLETION_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response).await.inspect_err(|e| {
            warn!(%request_id, error = %e, "completion request rejected");
        })?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        self.parse_completion(&json)
    }

    async fn stream_chat(
        &self,
        messages: &[Message],
        cancel: &CancellationToken,
        on_event: &mut (dyn for<'a> FnMut(StreamEvent<'a>) + Send),
    ) -> Result<StreamEnd, AiError> {
        let body = self.build_stream_body(messages);
        let request_id = new_correlation_id();

        debug!(%request_id, messages = messages.len(), "chat stream request");

        let request = self
            .http
            .post(&self.config.chat_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.chat_key))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%request_id, "chat stream cancelled before response");
                return Ok(StreamEnd::Cancelled);
            }
            response = await_headers(request, self.config.idle_timeout) => response?,
        };

        let response = check_status(response).await.inspect_err(|e| {
            warn!(%request_id, error = %e, "chat stream rejected");
        })?;

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !content_type.starts_with("text/event-stream") {
                debug!(%request_id, content_type, "chat stream has unexpected content type");
            }
        }

        on_event(StreamEvent::Opened);

        let summary = read_stream(
            response.bytes_stream(),
            &self.read_options(),
            cancel,
            |delta| on_event(StreamEvent::Delta(delta)),
        )
        .await
        .inspect_err(|e| warn!(%request_id, error = %e, "chat stream failed"))?;

        if summary.stats.discarded > 0 {
            warn!(
                %request_id,
                discarded = summary.stats.discarded,
                "chat stream contained malformed frames"
            );
        }

        Ok(summary.end)
    }
}
