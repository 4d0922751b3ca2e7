//! Upstream claim normalization
//!
//! Converts claims from the fact-check search API into flat [`ClaimRecord`]s,
//! substituting sentinel values for anything the upstream left out. Also
//! builds the synthetic records used in mock and fallback modes.

use crate::core::constants::{QUERY_PREVIEW_CHARS, fallback, mock, sentinel};
use crate::models::fact_check::ClaimRecord;
use crate::models::google::{Claim, ClaimReview};

/// Truncate a query to its first [`QUERY_PREVIEW_CHARS`] characters
///
/// Counts characters, not bytes, so multi-byte text never splits mid-codepoint.
pub fn truncate_query(query: &str) -> &str {
    match query.char_indices().nth(QUERY_PREVIEW_CHARS) {
        Some((idx, _)) => &query[..idx],
        None => query,
    }
}

fn sample_claim(query: &str) -> String {
    format!("Sample claim related to '{}'", truncate_query(query))
}

/// Record returned when no credential is configured
pub fn mock_record(query: &str) -> ClaimRecord {
    ClaimRecord {
        claim: sample_claim(query),
        verdict: mock::VERDICT.to_string(),
        source: mock::SOURCE.to_string(),
        url: String::new(),
        image: None,
    }
}

/// Record substituted for an upstream failure under the fallback policy
pub fn fallback_record(query: &str) -> ClaimRecord {
    ClaimRecord {
        claim: sample_claim(query),
        verdict: fallback::VERDICT.to_string(),
        source: fallback::SOURCE.to_string(),
        url: String::new(),
        image: None,
    }
}

/// Convert an upstream claim into a record without an image
///
/// Only the first review is considered; a claim with no reviews gets the
/// sentinel verdict and source and an empty URL.
pub fn convert_claim(claim: Claim) -> ClaimRecord {
    let review = claim
        .claim_review
        .into_iter()
        .next()
        .unwrap_or_default();

    let ClaimReview {
        publisher,
        url,
        textual_rating,
        ..
    } = review;

    ClaimRecord {
        claim: claim
            .text
            .unwrap_or_else(|| sentinel::CLAIM_TEXT.to_string()),
        verdict: textual_rating.unwrap_or_else(|| sentinel::VERDICT.to_string()),
        source: publisher
            .and_then(|p| p.name)
            .unwrap_or_else(|| sentinel::SOURCE.to_string()),
        url: url.unwrap_or_default(),
        image: None,
    }
}
