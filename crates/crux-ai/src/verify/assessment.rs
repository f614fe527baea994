//! Credibility assessment parsed from a model reply.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AiError;

pub const FALLBACK_EXPLANATION: &str = "Unable to parse credibility assessment. Please try again.";

/// Score used when the model omits one or sends something non-numeric.
const NEUTRAL_SCORE: u8 = 50;

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\s*([\s\S]*?)\s*```").unwrap());
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\s*([\s\S]*?)\s*```").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Verified,
    False,
    Mixed,
    #[serde(other)]
    Unverified,
}

impl Verdict {
    /// Case-insensitive; anything unrecognised is `Unverified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "VERIFIED" => Self::Verified,
            "FALSE" => Self::False,
            "MIXED" => Self::Mixed,
            _ => Self::Unverified,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::False => "FALSE",
            Self::Mixed => "MIXED",
            Self::Unverified => "UNVERIFIED",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredibilityAssessment {
    pub credibility_score: u8,
    pub verdict: Verdict,
    pub source_reliability: u8,
    pub evidence_strength: u8,
    pub consistency: u8,
    pub explanation: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl CredibilityAssessment {
    /// Neutral result used when the model reply is unusable.
    pub fn fallback() -> Self {
        Self {
            credibility_score: NEUTRAL_SCORE,
            verdict: Verdict::Unverified,
            source_reliability: NEUTRAL_SCORE,
            evidence_strength: NEUTRAL_SCORE,
            consistency: NEUTRAL_SCORE,
            explanation: FALLBACK_EXPLANATION.to_string(),
            evidence: Vec::new(),
        }
    }

    /// Parse a model reply, with or without a Markdown code fence.
    ///
    /// Scores are rounded and clamped to 0..=100.
    pub fn from_reply(content: &str) -> Result<Self, AiError> {
        let json: Value = serde_json::from_str(extract_json(content))
            .map_err(|e| AiError::ParseError(format!("assessment is not JSON: {e}")))?;
        let object = json
            .as_object()
            .ok_or_else(|| AiError::ParseError("assessment is not a JSON object".into()))?;

        let evidence = object
            .get("evidence")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            credibility_score: score(object.get("credibility_score")),
            verdict: object
                .get("verdict")
                .and_then(Value::as_str)
                .map(Verdict::from_label)
                .unwrap_or(Verdict::Unverified),
            source_reliability: score(object.get("source_reliability")),
            evidence_strength: score(object.get("evidence_strength")),
            consistency: score(object.get("consistency")),
            explanation: object
                .get("explanation")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            evidence,
        })
    }
}

/// The JSON body of a reply: a ```json fence, else any fence, else the whole text.
pub(crate) fn extract_json(content: &str) -> &str {
    JSON_FENCE
        .captures(content)
        .or_else(|| ANY_FENCE.captures(content))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|body| !body.is_empty())
        .unwrap_or(content)
}

fn score(value: Option<&Value>) -> u8 {
    score_or(value, NEUTRAL_SCORE)
}

/// Round and clamp a 0..=100 score, using `default` when absent or non-numeric.
pub(crate) fn score_or(value: Option<&Value>, default: u8) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(x) if x.is_finite() => x.round().clamp(0.0, 100.0) as u8,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "credibility_score": 82,
        "verdict": "VERIFIED",
        "source_reliability": 90,
        "evidence_strength": 75,
        "consistency": 80,
        "explanation": "Multiple agencies confirm it.",
        "evidence": ["NASA report", "ESA bulletin"]
    }"#;

    #[test]
    fn parses_bare_json() {
        let a = CredibilityAssessment::from_reply(REPLY).unwrap();
        assert_eq!(a.credibility_score, 82);
        assert_eq!(a.verdict, Verdict::Verified);
        assert_eq!(a.source_reliability, 90);
        assert_eq!(a.evidence, vec!["NASA report", "ESA bulletin"]);
    }

    #[test]
    fn prefers_json_fence() {
        let content = format!("Here you go:\n```json\n{REPLY}\n```\nHope that helps.");
        assert_eq!(extract_json(&content), REPLY.trim());
        assert!(CredibilityAssessment::from_reply(&content).is_ok());
    }

    #[test]
    fn falls_back_to_plain_fence() {
        let content = "```\n{\"verdict\": \"FALSE\"}\n```";
        assert_eq!(extract_json(content), "{\"verdict\": \"FALSE\"}");
    }

    #[test]
    fn empty_fence_uses_whole_text() {
        assert_eq!(extract_json("``````"), "``````");
    }

    #[test]
    fn scores_are_rounded_and_clamped() {
        let a = CredibilityAssessment::from_reply(
            r#"{"credibility_score": 140, "source_reliability": -3,
                "evidence_strength": 49.6, "consistency": "71", "verdict": "MIXED",
                "explanation": "x"}"#,
        )
        .unwrap();
        assert_eq!(a.credibility_score, 100);
        assert_eq!(a.source_reliability, 0);
        assert_eq!(a.evidence_strength, 50);
        assert_eq!(a.consistency, 71);
        assert_eq!(a.verdict, Verdict::Mixed);
    }

    #[test]
    fn missing_fields_take_neutral_defaults() {
        let a = CredibilityAssessment::from_reply("{}").unwrap();
        assert_eq!(a.credibility_score, 50);
        assert_eq!(a.verdict, Verdict::Unverified);
        assert_eq!(a.explanation, "");
        assert!(a.evidence.is_empty());
    }

    #[test]
    fn verdict_labels() {
        assert_eq!(Verdict::from_label("false"), Verdict::False);
        assert_eq!(Verdict::from_label(" Verified "), Verdict::Verified);
        assert_eq!(Verdict::from_label("LIKELY TRUE"), Verdict::Unverified);

        let parsed: Verdict = serde_json::from_str("\"SOMETIMES\"").unwrap();
        assert_eq!(parsed, Verdict::Unverified);
        assert_eq!(serde_json::to_string(&Verdict::Mixed).unwrap(), "\"MIXED\"");
        assert_eq!(Verdict::False.to_string(), "FALSE");
    }

    #[test]
    fn prose_and_non_objects_are_rejected() {
        assert!(matches!(
            CredibilityAssessment::from_reply("I think it is true."),
            Err(AiError::ParseError(_))
        ));
        assert!(matches!(
            CredibilityAssessment::from_reply("[1, 2]"),
            Err(AiError::ParseError(_))
        ));
    }

    #[test]
    fn fallback_is_neutral() {
        let a = CredibilityAssessment::fallback();
        assert_eq!(a.credibility_score, 50);
        assert_eq!(a.consistency, 50);
        assert_eq!(a.verdict, Verdict::Unverified);
        assert_eq!(a.explanation, FALLBACK_EXPLANATION);
        assert!(a.evidence.is_empty());
    }
}
