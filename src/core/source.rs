//! Fact-check source abstraction
//!
//! This module defines the common trait for fact-check search backends (the
//! live upstream client and the credential-less mock) together with the error
//! taxonomy for upstream failures.

use crate::models::fact_check::SearchResult;
use async_trait::async_trait;
use thiserror::Error;

/// Error types for upstream search operations
///
/// `Upstream` is a non-success status, `Unreachable` a transport failure or
/// timeout, `Malformed` a body that is not the expected JSON.
#[derive(Debug, Error)]
pub enum FactCheckError {
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed upstream response: {0}")]
    Malformed(String),
}

/// Trait for fact-check search backends
#[async_trait]
pub trait FactCheckSource: Send + Sync {
    /// Search for fact checks matching free text
    ///
    /// Results keep upstream order, and each record's image has already been
    /// resolved.
    async fn search(&self, query: &str) -> Result<SearchResult, FactCheckError>;

    /// Get the source name
    fn source_name(&self) -> &str;
}

/// Behavior when the upstream search fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamErrorPolicy {
    /// Surface the failure to the caller
    #[default]
    Propagate,
    /// Replace the failure with a single fallback record
    Fallback,
}

impl UpstreamErrorPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "propagate" => Some(UpstreamErrorPolicy::Propagate),
            "fallback" => Some(UpstreamErrorPolicy::Fallback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!(
            UpstreamErrorPolicy::from_str("Propagate"),
            Some(UpstreamErrorPolicy::Propagate)
        );
        assert_eq!(
            UpstreamErrorPolicy::from_str("fallback"),
            Some(UpstreamErrorPolicy::Fallback)
        );
        assert_eq!(UpstreamErrorPolicy::from_str("retry"), None);
        assert_eq!(UpstreamErrorPolicy::from_str("swallow"), None);
    }
}
