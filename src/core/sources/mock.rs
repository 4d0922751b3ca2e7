//! Credential-less mock source

use crate::conversion::claim_converter::mock_record;
use crate::core::source::{FactCheckError, FactCheckSource};
use crate::models::fact_check::SearchResult;
use async_trait::async_trait;
use tracing::warn;

/// Source used when no API key is configured
///
/// Always answers with one fixed "Mock Fact Checker" record echoing the
/// query. Makes no network calls.
#[derive(Debug, Default, Clone)]
pub struct MockFactCheckSource;

impl MockFactCheckSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FactCheckSource for MockFactCheckSource {
    async fn search(&self, query: &str) -> Result<SearchResult, FactCheckError> {
        warn!("No fact-check API key configured, returning mock data");
        Ok(vec![mock_record(query)])
    }

    fn source_name(&self) -> &str {
        "Mock Fact Checker"
    }
}
