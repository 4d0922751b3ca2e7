//! Fact-check service data models
//!
//! Request and response bodies of the `/check-news` endpoint.

use serde::{Deserialize, Serialize};

/// A normalized, enriched fact-check result
///
/// `claim`, `verdict`, `source` and `url` are always populated (sentinel
/// values stand in for anything the upstream omitted). `image` is the only
/// field that may be absent and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim: String,
    pub verdict: String,
    pub source: String,
    pub url: String,
    pub image: Option<String>,
}

/// Ordered search result, in upstream order
pub type SearchResult = Vec<ClaimRecord>;

/// POST /check-news request body
#[derive(Debug, Clone, Deserialize)]
pub struct CheckNewsRequest {
    pub text: String,
}

/// POST /check-news response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckNewsResponse {
    pub verdict: String,
    pub google_fact_check: SearchResult,
}
