//! Keyword screening of processed claims for emerging crises.
//!
//! Each claim is split into lowercase words; a word matches a keyword when
//! it equals it or adds a plain inflection (`s`, `es`, `ed`, `ing`). Any claim
//! with at least one match becomes a high-severity alert.

use crux_common::{new_id, CruxError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::assessment::Verdict;
use super::store::{ClaimRecord, ClaimStore};

pub const CRISIS_KEYWORDS: &[&str] = &[
    "earthquake", "pandemic", "violence", "tsunami", "terror", "flood", "war", "attack",
    "assassinated", "airstrike", "conflict", "dead", "killed", "crisis", "warning", "strike",
    "military", "navy", "russia", "israel", "lebanon", "gaza", "ukraine", "iran", "missile",
    "bomb", "blast", "explosion", "fire", "wildfire", "storm", "hurricane", "tornado", "typhoon",
    "cyclone", "weather", "heat", "emergency", "rescue", "police", "arrest", "shoot", "gun",
    "crime", "murder", "crash", "accident", "disaster", "danger", "threat", "alert", "breaking",
];

const INFLECTIONS: &[&str] = &["s", "es", "ed", "ing"];

const ALERT_TITLE: &str = "Potential Crisis Detected";
const ALERT_SEVERITY: &str = "HIGH";
const UNKNOWN_REGION: &str = "Unknown";
const RECOMMENDED_ACTIONS: [&str; 2] = ["Monitor situation", "Verify sources"];

/// A claim to screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisCandidate {
    pub id: String,
    pub text: String,
    /// Whether a verification judged the claim `VERIFIED`.
    pub verified: bool,
}

impl CrisisCandidate {
    /// A claim that has not been through verification.
    pub fn unverified(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            verified: false,
        }
    }
}

impl From<&ClaimRecord> for CrisisCandidate {
    fn from(record: &ClaimRecord) -> Self {
        let text = record
            .claim_text
            .as_deref()
            .or(record.claim_url.as_deref())
            .unwrap_or_default();
        Self {
            id: record.id.to_string(),
            text: text.to_string(),
            verified: record.verdict == Verdict::Verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisAlert {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub region: String,
    pub verified: bool,
    /// Matched keywords, in keyword-list order.
    pub keywords: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisReport {
    pub crisis_detected: bool,
    pub alerts: Vec<CrisisAlert>,
    pub recommended_actions: Vec<String>,
}

/// Screen `candidates`, one alert per matching claim, in input order.
pub fn detect_crisis(candidates: &[CrisisCandidate]) -> CrisisReport {
    let alerts: Vec<CrisisAlert> = candidates
        .iter()
        .filter_map(|candidate| {
            let keywords = matched_keywords(&candidate.text);
            if keywords.is_empty() {
                return None;
            }
            debug!(id = %candidate.id, ?keywords, "crisis keywords matched");
            Some(CrisisAlert {
                id: candidate.id.clone(),
                title: ALERT_TITLE.to_string(),
                severity: ALERT_SEVERITY.to_string(),
                region: UNKNOWN_REGION.to_string(),
                verified: candidate.verified,
                keywords,
                description: candidate.text.clone(),
            })
        })
        .collect();

    info!(claims = candidates.len(), alerts = alerts.len(), "crisis screening finished");

    let recommended_actions = if alerts.is_empty() {
        Vec::new()
    } else {
        RECOMMENDED_ACTIONS.iter().map(|a| a.to_string()).collect()
    };
    CrisisReport {
        crisis_detected: !alerts.is_empty(),
        alerts,
        recommended_actions,
    }
}

/// Screen every record in `store`.
pub async fn detect_crisis_in(store: &dyn ClaimStore) -> Result<CrisisReport, CruxError> {
    let candidates: Vec<CrisisCandidate> = store.list().await?.iter().map(Into::into).collect();
    Ok(detect_crisis(&candidates))
}

fn matched_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CRISIS_KEYWORDS
        .iter()
        .filter(|keyword| words.iter().any(|word| word_matches(word, keyword)))
        .map(|keyword| keyword.to_string())
        .collect()
}

fn word_matches(word: &str, keyword: &str) -> bool {
    match word.strip_prefix(keyword) {
        Some("") => true,
        Some(rest) => INFLECTIONS.contains(&rest),
        None => false,
    }
}
