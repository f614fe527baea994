//! Claim verification.
//!
//! A claim (text, URL, or both) is sent to the completion API with a
//! fact-checking prompt. The model's reply is parsed into a
//! [`CredibilityAssessment`]; replies that cannot be parsed yield a neutral
//! fallback instead of an error. Results can optionally be saved through a
//! [`ClaimStore`] when the caller is identified.
//!
//! Follow-up tools:
//! - [`VerdictExplainer`]: a verdict in plain words, in the reader's language
//! - [`EvidenceScorer`]: sub-scores for a claim against gathered evidence
//! - [`detect_crisis`]: keyword screening of processed claims

mod assessment;
mod crisis;
mod explain;
mod prompt;
mod score;
mod store;
#[cfg(test)]
mod testing;
mod verifier;

pub use assessment::{CredibilityAssessment, Verdict, FALLBACK_EXPLANATION};
pub use crisis::{
    detect_crisis, detect_crisis_in, CrisisAlert, CrisisCandidate, CrisisReport, CRISIS_KEYWORDS,
};
pub use explain::{VerdictExplainer, DEFAULT_LANGUAGE};
pub use score::{EvidenceScore, EvidenceScorer};
pub use store::{ClaimRecord, ClaimStatus, ClaimStore, MemoryClaimStore};
pub use verifier::{ClaimRequest, ClaimVerifier};
