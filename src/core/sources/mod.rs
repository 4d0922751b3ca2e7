//! Fact-check source implementations

pub mod google;
pub mod mock;

pub use google::GoogleFactCheckSource;
pub use mock::MockFactCheckSource;

use crate::core::config::Config;
use crate::core::enricher::ImageEnricher;
use crate::core::source::FactCheckSource;
use anyhow::Context;
use std::sync::Arc;
use tracing::warn;

/// Pick the live source when a credential is configured, the mock otherwise
pub fn build_source(config: &Config) -> anyhow::Result<Arc<dyn FactCheckSource>> {
    let Some(api_key) = config.api_key.clone() else {
        warn!("No API key configured; /check-news will return mock data");
        return Ok(Arc::new(MockFactCheckSource::new()));
    };

    let mut source = GoogleFactCheckSource::new(
        api_key,
        config.search_url.clone(),
        config.search_timeout,
    )
    .context("Failed to create search HTTP client")?
    .with_policy(config.upstream_error_policy)
    .with_language_code(config.language_code.clone())
    .with_page_size(config.page_size);

    if config.enrichment_enabled {
        let enricher =
            ImageEnricher::new(config.image_timeout).context("Failed to create page HTTP client")?;
        source = source.with_enricher(enricher, config.enrichment_concurrency);
    }

    Ok(Arc::new(source))
}
