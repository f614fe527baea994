//! Prompts for claim verification.

use super::verifier::ClaimRequest;

pub(crate) const SYSTEM_PROMPT: &str = "You are an expert fact-checker. Analyze claims \
objectively and provide credibility assessments in the requested JSON format.";

pub(crate) fn user_prompt(request: &ClaimRequest) -> String {
    let mut claim = format!("Claim: {}\n", request.text().unwrap_or_default());
    if let Some(url) = request.url() {
        claim.push_str(&format!("URL: {url}\n"));
    }

    format!(
        "Analyze the following claim for credibility and potential misinformation:\n\
         \n\
         {claim}\n\
         Provide a detailed credibility assessment with:\n\
         1. Overall credibility score (0-100)\n\
         2. Verdict (VERIFIED, FALSE, MIXED, or UNVERIFIED)\n\
         3. Source reliability score (0-100)\n\
         4. Evidence strength score (0-100)\n\
         5. Consistency score (0-100)\n\
         6. Brief explanation of your assessment\n\
         7. Key evidence points (if any)\n\
         \n\
         Return your response as JSON with these exact keys:\n\
         {{\n  \
           \"credibility_score\": <number>,\n  \
           \"verdict\": \"<string>\",\n  \
           \"source_reliability\": <number>,\n  \
           \"evidence_strength\": <number>,\n  \
           \"consistency\": <number>,\n  \
           \"explanation\": \"<string>\",\n  \
           \"evidence\": [\"<string>\", ...]\n\
         }}"
    )
}
