//! Scoring a claim against evidence the caller already collected.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{AiClient, AiError, Message};

use super::assessment::{extract_json, score_or, Verdict};

const SYSTEM_PROMPT: &str = "You are a fact-checking AI. Output ONLY JSON.";

/// Sub-scores and verdict for a claim weighed against supplied evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceScore {
    pub final_score: u8,
    pub source_reliability: u8,
    pub evidence_strength: u8,
    pub consistency: u8,
    pub verdict: Verdict,
}

impl EvidenceScore {
    /// All zeros and `UNVERIFIED`: nothing could be concluded.
    pub fn unscored() -> Self {
        Self {
            final_score: 0,
            source_reliability: 0,
            evidence_strength: 0,
            consistency: 0,
            verdict: Verdict::Unverified,
        }
    }

    /// Parse a model reply. Missing or non-numeric scores count as 0.
    pub fn from_reply(content: &str) -> Result<Self, AiError> {
        let json: Value = serde_json::from_str(extract_json(content))
            .map_err(|e| AiError::ParseError(format!("score is not JSON: {e}")))?;
        let object = json
            .as_object()
            .ok_or_else(|| AiError::ParseError("score is not a JSON object".into()))?;

        Ok(Self {
            final_score: score_or(object.get("final_score"), 0),
            source_reliability: score_or(object.get("source_reliability"), 0),
            evidence_strength: score_or(object.get("evidence_strength"), 0),
            consistency: score_or(object.get("consistency"), 0),
            verdict: object
                .get("verdict")
                .and_then(Value::as_str)
                .map(Verdict::from_label)
                .unwrap_or(Verdict::Unverified),
        })
    }
}

pub struct EvidenceScorer {
    client: Arc<dyn AiClient>,
}

impl EvidenceScorer {
    pub fn new(client: Arc<dyn AiClient>) -> Self {
        Self { client }
    }

    /// Score `claim` against `evidence`. An unusable reply yields
    /// [`EvidenceScore::unscored`]; only validation and transport failures
    /// are errors.
    pub async fn score(&self, claim: &str, evidence: &[String]) -> Result<EvidenceScore, AiError> {
        let claim = claim.trim();
        if claim.is_empty() {
            return Err(AiError::InvalidRequest("claim text is required".into()));
        }

        info!(evidence = evidence.len(), "scoring claim against evidence");
        let messages = [
            Message::system(SYSTEM_PROMPT),
            Message::user(score_prompt(claim, evidence)),
        ];
        let reply = self.client.complete(&messages).await?;
        debug!(chars = reply.len(), "score reply received");

        Ok(EvidenceScore::from_reply(&reply).unwrap_or_else(|e| {
            warn!(error = %e, "failed to parse evidence score");
            EvidenceScore::unscored()
        }))
    }
}

fn score_prompt(claim: &str, evidence: &[String]) -> String {
    let mut listed = String::new();
    for item in evidence.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        listed.push_str(&format!("- {item}\n"));
    }
    if listed.is_empty() {
        listed.push_str("(none)\n");
    }

    format!(
        "Analyze the following claim based on the evidence provided.\n\
         Claim: {claim}\n\
         Evidence:\n\
         {listed}\n\
         Return a JSON object with the following keys:\n\
         - final_score (0-100)\n\
         - source_reliability (0-100)\n\
         - evidence_strength (0-100)\n\
         - consistency (0-100)\n\
         - verdict (VERIFIED, FALSE, MIXED, UNVERIFIED)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::testing::FixedReply;

    #[test]
    fn prompt_lists_evidence() {
        let prompt = score_prompt(
            "Tap water is safe",
            &["EPA report (https://epa.test)".into(), "  ".into()],
        );
        assert!(prompt.contains("Claim: Tap water is safe\n"));
        assert!(prompt.contains("Evidence:\n- EPA report (https://epa.test)\n"));
        assert!(prompt.contains("- verdict (VERIFIED, FALSE, MIXED, UNVERIFIED)"));
        assert!(!prompt.contains("- \n"));
    }

    #[test]
    fn prompt_without_evidence_says_none() {
        assert!(score_prompt("x", &[]).contains("Evidence:\n(none)\n"));
    }

    #[test]
    fn missing_scores_are_zero() {
        let score = EvidenceScore::from_reply(r#"{"final_score": 64.4, "verdict": "mixed"}"#).unwrap();
        assert_eq!(score.final_score, 64);
        assert_eq!(score.source_reliability, 0);
        assert_eq!(score.consistency, 0);
        assert_eq!(score.verdict, Verdict::Mixed);
    }

    #[tokio::test]
    async fn fenced_reply_is_parsed() {
        let client = FixedReply::new(
            "```json\n{\"final_score\": 91, \"source_reliability\": 88, \
             \"evidence_strength\": 90, \"consistency\": 95, \"verdict\": \"VERIFIED\"}\n```",
        );
        let score = EvidenceScorer::new(client.clone())
            .score("claim", &["source".into()])
            .await
            .unwrap();
        assert_eq!(
            score,
            EvidenceScore {
                final_score: 91,
                source_reliability: 88,
                evidence_strength: 90,
                consistency: 95,
                verdict: Verdict::Verified,
            }
        );
        assert_eq!(client.sent.lock().unwrap()[0][0].content, SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn prose_reply_is_unscored() {
        let score = EvidenceScorer::new(FixedReply::new("Looks fine to me."))
            .score("claim", &[])
            .await
            .unwrap();
        assert_eq!(score, EvidenceScore::unscored());
    }

    #[tokio::test]
    async fn blank_claim_is_rejected() {
        let client = FixedReply::new("{}");
        let err = EvidenceScorer::new(client.clone())
            .score(" ", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidRequest(_)));
        assert!(client.sent.lock().unwrap().is_empty());
    }
}
