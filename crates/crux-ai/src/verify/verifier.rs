//! Claim verifier: prompt, complete, parse, optionally persist.

use std::sync::Arc;

use crux_common::UserId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{AiClient, AiError, Message};

use super::assessment::CredibilityAssessment;
use super::prompt::{user_prompt, SYSTEM_PROMPT};
use super::store::{ClaimRecord, ClaimStore};

/// A claim to check. At least one of `text` or `url` must be non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub text: Option<String>,
    pub url: Option<String>,
}

impl ClaimRequest {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            url: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            text: None,
            url: Some(url.into()),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Claim text, trimmed; `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        non_blank(self.text.as_deref())
    }

    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    pub fn validate(&self) -> Result<(), AiError> {
        if self.text().is_none() && self.url().is_none() {
            return Err(AiError::InvalidRequest(
                "Either claim text or claim URL is required".into(),
            ));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Sends claims to the completion API and normalizes the verdict.
pub struct ClaimVerifier {
    client: Arc<dyn AiClient>,
    store: Option<Arc<dyn ClaimStore>>,
}

impl ClaimVerifier {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self {
            client,
            store: None,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ClaimStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Assess a claim. A reply that cannot be parsed yields
    /// [`CredibilityAssessment::fallback`]; only validation and transport
    /// failures are errors. With a user and a store, the result is saved.
    pub async fn verify(
        &self,
        request: &ClaimRequest,
        user: Option<&UserId>,
    ) -> Result<CredibilityAssessment, AiError> {
        request.validate()?;

        let subject = request.text().or(request.url()).unwrap_or_default();
        info!(claim = subject, "verifying claim");

        let messages = [Message::system(SYSTEM_PROMPT), Message::user(user_prompt(request))];
        let reply = self.client.complete(&messages).await?;
        debug!(chars = reply.len(), "verification reply received");

        let assessment = CredibilityAssessment::from_reply(&reply).unwrap_or_else(|e| {
            warn!(error = %e, "failed to parse credibility assessment, using fallback");
            CredibilityAssessment::fallback()
        });

        if let (Some(user), Some(store)) = (user, &self.store) {
            let record = ClaimRecord::completed(user.clone(), request, &assessment);
            let record_id = record.id;
            match store.save(record).await {
                Ok(()) => debug!(%record_id, user = %user, "claim saved"),
                Err(e) => warn!(%record_id, error = %e, "failed to save claim"),
            }
        }

        Ok(assessment)
    }
}
