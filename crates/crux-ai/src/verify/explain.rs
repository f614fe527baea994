//! Plain-language explanation of a verdict, in the reader's language.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{AiClient, AiError, Message};

use super::assessment::Verdict;

/// Language used when the caller does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

pub struct VerdictExplainer {
    client: Arc<dyn AiClient>,
}

impl VerdictExplainer {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    /// Ask the model why `claim` was judged `verdict`, answering in `language`.
    ///
    /// A blank language means [`DEFAULT_LANGUAGE`]. A blank claim or an empty
    /// reply is an error.
    pub async fn explain(
        &self,
        claim: &str,
        verdict: Verdict,
        language: &str,
    ) -> Result<String, AiError> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Err(AiError::InvalidRequest("claim text is required".into()));
        }
        let language = match language.trim() {
            "" => DEFAULT_LANGUAGE,
            lang => lang,
        };

        info!(%verdict, language, "explaining verdict");
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(explain_prompt(claim, verdict, language)),
        ];
        let reply = self.client.complete(&messages).await?;
        debug!(chars = reply.len(), "explanation received");

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AiError::ParseError("explanation is empty".into()));
        }
        Ok(reply.to_string())
    }
}

fn explain_prompt(claim: &str, verdict: Verdict, language: &str) -> String {
    format!("Explain why the claim '{claim}' was judged as {verdict}. Language: {language}. Keep it concise.")
}
