//! Open Graph image enrichment
//!
//! Fetches a claim's source page and pulls out its `og:image` meta tag. This
//! is strictly best-effort: [`ImageEnricher::extract_image`] returns `Option`
//! rather than `Result`, so no failure can leak into the claim search.

use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Selector for the Open Graph image tag
const OG_IMAGE_SELECTOR: &str = r#"meta[property="og:image"]"#;

/// Fetches pages and extracts their representative image
#[derive(Debug, Clone)]
pub struct ImageEnricher {
    client: Client,
}

impl ImageEnricher {
    /// Create a new enricher
    ///
    /// # Arguments
    ///
    /// * `timeout` - Page fetch timeout in seconds
    pub fn new(timeout: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and return its `og:image` content, if any
    ///
    /// An empty URL returns `None` without touching the network. Network
    /// errors, timeouts, unparsable markup and a missing or empty tag all
    /// return `None`.
    pub async fn extract_image(&self, url: &str) -> Option<String> {
        if url.is_empty() {
            return None;
        }

        match self.fetch_page(url).await {
            Ok(html) => {
                let image = og_image_from_html(&html, url);
                debug!(%url, found = image.is_some(), "Scanned page for og:image");
                image
            }
            Err(e) => {
                debug!(%url, error = %e, "Page fetch failed, skipping image");
                None
            }
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send().await?.text().await
    }
}

/// Extract the first `og:image` tag's content from an HTML document
///
/// Relative values are resolved against `page_url`; absolute values are
/// returned as written.
pub fn og_image_from_html(html: &str, page_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(OG_IMAGE_SELECTOR).ok()?;

    let content = document
        .select(&selector)
        .next()?
        .value()
        .attr("content")?
        .trim();

    if content.is_empty() {
        return None;
    }

    Some(resolve_image_url(content, page_url))
}

fn resolve_image_url(content: &str, page_url: &str) -> String {
    if Url::parse(content).is_ok() {
        return content.to_string();
    }

    Url::parse(page_url)
        .and_then(|base| base.join(content))
        .map(|resolved| resolved.to_string())
        .unwrap_or_else(|_| content.to_string())
}
