//! Constants for sentinel values, verdict messages and upstream endpoints
//!
//! This module defines the string constants that appear in responses when the
//! upstream omits a field, when no credential is configured, and when the
//! upstream fails under the fallback policy.

/// Upstream fact-check search endpoint
pub const DEFAULT_SEARCH_URL: &str = "https://factchecktools.googleapis.com/v1alpha1/claims:search";

/// Maximum number of query characters echoed into synthetic records and logs
pub const QUERY_PREVIEW_CHARS: usize = 80;

/// Defaults substituted for fields the upstream omits
pub mod sentinel {
    /// Claim text default
    pub const CLAIM_TEXT: &str = "No claim text available.";

    /// Verdict default
    pub const VERDICT: &str = "No verdict provided";

    /// Publisher name default
    pub const SOURCE: &str = "Unknown";
}

/// Synthetic record returned when no credential is configured
pub mod mock {
    /// Mock verdict
    pub const VERDICT: &str = "False";

    /// Mock source name
    pub const SOURCE: &str = "Mock Fact Checker";
}

/// Synthetic record returned when the upstream fails under the fallback policy
pub mod fallback {
    /// Fallback verdict
    pub const VERDICT: &str = "Unknown";

    /// Fallback source name
    pub const SOURCE: &str = "Fallback Fact Checker";
}

/// Top-level verdict messages of the /check-news response
pub mod verdict {
    /// At least one claim matched
    pub const FOUND: &str = "Fact checks found. Review the claims below.";

    /// No claims matched
    pub const NONE_FOUND: &str = "No fact checks found.";
}

/// Client-facing error details
pub mod detail {
    /// Upstream search API failure
    pub const UPSTREAM: &str = "Upstream fact-check service error";

    /// Anything else
    pub const INTERNAL: &str = "Internal server error";
}
