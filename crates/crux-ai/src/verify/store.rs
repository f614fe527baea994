//! Persistence for completed claim verifications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crux_common::{CruxError, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::assessment::{CredibilityAssessment, Verdict};
use super::verifier::ClaimRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Completed,
}

/// One saved verification, keyed to the user who asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: Uuid,
    pub user_id: UserId,
    pub claim_text: Option<String>,
    pub claim_url: Option<String>,
    pub verdict: Verdict,
    pub credibility_score: u8,
    pub evidence: Vec<String>,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl ClaimRecord {
    pub fn completed(
        user_id: UserId,
        request: &ClaimRequest,
        assessment: &CredibilityAssessment,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            claim_text: request.text().map(String::from),
            claim_url: request.url().map(String::from),
            verdict: assessment.verdict,
            credibility_score: assessment.credibility_score,
            evidence: assessment.evidence.clone(),
            status: ClaimStatus::Completed,
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn save(&self, record: ClaimRecord) -> Result<(), CruxError>;

    /// Every saved record, oldest first.
    async fn list(&self) -> Result<Vec<ClaimRecord>, CruxError>;
}

/// Keeps records in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryClaimStore {
    records: Mutex<Vec<ClaimRecord>>,
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<ClaimRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    async fn save(&self, record: ClaimRecord) -> Result<(), CruxError> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ClaimRecord>, CruxError> {
        Ok(self.records().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_keeps_order() {
        let store = MemoryClaimStore::new();
        let user = UserId::parse("user-1").unwrap();
        let assessment = CredibilityAssessment::fallback();

        for text in ["first", "second"] {
            let record = ClaimRecord::completed(user.clone(), &ClaimRequest::from_text(text), &assessment);
            store.save(record).await.unwrap();
        }

        let records = store.list().await.unwrap();
        assert_eq!(records, store.records().await);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].claim_text.as_deref(), Some("first"));
        assert_eq!(records[1].claim_text.as_deref(), Some("second"));
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn record_serializes_with_status_and_uppercase_verdict() {
        let record = ClaimRecord::completed(
            UserId::parse("u").unwrap(),
            &ClaimRequest::from_url("https://news.test/a"),
            &CredibilityAssessment::fallback(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["verdict"], "UNVERIFIED");
        assert_eq!(json["user_id"], "u");
        assert_eq!(json["claim_text"], serde_json::Value::Null);
        assert_eq!(json["claim_url"], "https://news.test/a");
    }
}
