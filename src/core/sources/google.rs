//! Google Fact Check Tools source implementation

use crate::conversion::claim_converter::{convert_claim, fallback_record, truncate_query};
use crate::core::enricher::ImageEnricher;
use crate::core::source::{FactCheckError, FactCheckSource, UpstreamErrorPolicy};
use crate::models::fact_check::{ClaimRecord, SearchResult};
use crate::models::google::ClaimSearchResponse;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Live fact-check search against the Google claims search API
pub struct GoogleFactCheckSource {
    client: Client,
    api_key: String,
    search_url: String,
    language_code: Option<String>,
    page_size: Option<u32>,
    policy: UpstreamErrorPolicy,
    enricher: Option<ImageEnricher>,
    concurrency: usize,
}

impl GoogleFactCheckSource {
    /// Create a new Google source
    ///
    /// Starts with no enricher, the propagate policy and no optional
    /// parameters; see the `with_*` methods.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Fact Check Tools API key
    /// * `search_url` - `claims:search` endpoint
    /// * `timeout` - Search request timeout in seconds
    pub fn new(api_key: String, search_url: String, timeout: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self {
            client,
            api_key,
            search_url,
            language_code: None,
            page_size: None,
            policy: UpstreamErrorPolicy::Propagate,
            enricher: None,
            concurrency: 1,
        })
    }

    /// Attach an image enricher with at most `concurrency` fetches in flight
    pub fn with_enricher(mut self, enricher: ImageEnricher, concurrency: usize) -> Self {
        self.enricher = Some(enricher);
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_policy(mut self, policy: UpstreamErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_language_code(mut self, language_code: Option<String>) -> Self {
        self.language_code = language_code;
        self
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Turn an upstream error body into a readable message
    fn classify_error(status: u16, error_detail: &str) -> String {
        let error_lower = error_detail.to_lowercase();

        if error_lower.contains("api key not valid") || error_lower.contains("api_key_invalid") {
            return "Invalid API key. Please check your GOOGLE_API_KEY configuration.".to_string();
        }

        if status == 429 || error_lower.contains("quota") {
            return "Quota exceeded. Please wait and try again.".to_string();
        }

        if status == 403 {
            return "Access denied. Check that the Fact Check Tools API is enabled for this key."
                .to_string();
        }

        error_detail.to_string()
    }

    /// Internal method to send the search request
    async fn fetch_claims(&self, query: &str) -> Result<ClaimSearchResponse, FactCheckError> {
        let mut params: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(ref language_code) = self.language_code {
            params.push(("languageCode", language_code.clone()));
        }
        if let Some(page_size) = self.page_size {
            params.push(("pageSize", page_size.to_string()));
        }

        // Errors are stripped of their URL; it carries the API key
        let response = self
            .client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| FactCheckError::Unreachable(e.without_url().to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            return Err(FactCheckError::Upstream {
                status: status.as_u16(),
                message: Self::classify_error(status.as_u16(), &error_text),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FactCheckError::Unreachable(e.without_url().to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| FactCheckError::Malformed(format!("Failed to parse response: {}", e)))
    }

    /// Resolve every record's image, preserving order
    async fn enrich(&self, records: Vec<ClaimRecord>) -> Vec<ClaimRecord> {
        let Some(enricher) = self.enricher.as_ref() else {
            return records;
        };

        stream::iter(records)
            .map(|mut record| async move {
                record.image = enricher.extract_image(&record.url).await;
                record
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

#[async_trait]
impl FactCheckSource for GoogleFactCheckSource {
    async fn search(&self, query: &str) -> Result<SearchResult, FactCheckError> {
        info!(
            query = truncate_query(query),
            "Sending claim search to Google Fact Check Tools"
        );

        let response = match self.fetch_claims(query).await {
            Ok(response) => response,
            Err(e) => {
                return match self.policy {
                    UpstreamErrorPolicy::Propagate => Err(e),
                    UpstreamErrorPolicy::Fallback => {
                        warn!(error = %e, "Upstream search failed, substituting fallback record");
                        Ok(vec![fallback_record(query)])
                    }
                };
            }
        };

        let records: Vec<ClaimRecord> = response.claims.into_iter().map(convert_claim).collect();
        let records = self.enrich(records).await;

        info!(
            claims = records.len(),
            images = records.iter().filter(|r| r.image.is_some()).count(),
            "Google Fact Check Tools response"
        );

        Ok(records)
    }

    fn source_name(&self) -> &str {
        "Google Fact Check Tools"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> GoogleFactCheckSource {
        GoogleFactCheckSource::new(
            "test-key".to_string(),
            format!("{}/v1alpha1/claims:search", server.uri()),
            5,
        )
        .unwrap()
    }

    async fn mount_search(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v1alpha1/claims:search"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[test]
    fn test_classify_invalid_key() {
        let message = GoogleFactCheckSource::classify_error(
            400,
            r#"{"error": {"message": "API key not valid. Please pass a valid API key."}}"#,
        );
        assert!(message.contains("API key"));
    }

    #[test]
    fn test_classify_passthrough() {
        assert_eq!(GoogleFactCheckSource::classify_error(500, "boom"), "boom");
    }

    #[tokio::test]
    async fn test_search_normalizes_and_enriches_in_order() {
        let server = MockServer::start().await;
        let first_page = format!("{}/pages/first", server.uri());
        let second_page = format!("{}/pages/second", server.uri());

        Mock::given(method("GET"))
            .and(path("/v1alpha1/claims:search"))
            .and(query_param("query", "vaccines cause autism"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "claims": [
                    {
                        "text": "Vaccines cause autism",
                        "claimReview": [{
                            "publisher": {"name": "PolitiFact"},
                            "url": &first_page,
                            "textualRating": "False"
                        }]
                    },
                    {
                        "text": "MMR is linked to autism",
                        "claimReview": [{
                            "publisher": {"name": "Snopes"},
                            "url": &second_page,
                            "textualRating": "Mixture"
                        }]
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/pages/first"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<meta property="og:image" content="https://cdn.example.org/first.jpg">"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/pages/second"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>no image</p>"))
            .mount(&server)
            .await;

        let source = source_for(&server).with_enricher(ImageEnricher::new(5).unwrap(), 4);
        let records = source.search("vaccines cause autism").await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].claim, "Vaccines cause autism");
        assert_eq!(records[0].verdict, "False");
        assert_eq!(records[0].source, "PolitiFact");
        assert_eq!(records[0].url, first_page);
        assert_eq!(
            records[0].image.as_deref(),
            Some("https://cdn.example.org/first.jpg")
        );
        assert_eq!(records[1].source, "Snopes");
        assert_eq!(records[1].verdict, "Mixture");
        assert!(records[1].image.is_none());
    }

    #[tokio::test]
    async fn test_empty_claims() {
        let server = MockServer::start().await;
        mount_search(&server, ResponseTemplate::new(200).set_body_json(json!({"claims": []})))
            .await;

        let records = source_for(&server).search("nothing").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_body_without_claims_key() {
        let server = MockServer::start().await;
        mount_search(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let records = source_for(&server).search("nothing").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_missing_rating_and_review() {
        let server = MockServer::start().await;
        mount_search(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "claims": [
                    {"text": "a", "claimReview": [{"publisher": {"name": "X"}}]},
                    {"text": "b"}
                ]
            })),
        )
        .await;

        let records = source_for(&server).search("q").await.unwrap();
        assert_eq!(records[0].verdict, "No verdict provided");
        assert_eq!(records[0].source, "X");
        assert_eq!(records[1].verdict, "No verdict provided");
        assert_eq!(records[1].source, "Unknown");
        assert_eq!(records[1].url, "");
    }

    #[tokio::test]
    async fn test_optional_params_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("languageCode", "en-US"))
            .and(query_param("pageSize", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"claims": []})))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server)
            .with_language_code(Some("en-US".to_string()))
            .with_page_size(Some(3));
        assert!(source.search("q").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_status_propagates() {
        let server = MockServer::start().await;
        mount_search(&server, ResponseTemplate::new(500).set_body_string("backend down")).await;

        let err = source_for(&server).search("q").await.unwrap_err();
        assert!(matches!(err, FactCheckError::Upstream { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_client_error_propagates() {
        let server = MockServer::start().await;
        mount_search(&server, ResponseTemplate::new(403).set_body_string("forbidden")).await;

        let err = source_for(&server).search("q").await.unwrap_err();
        assert!(matches!(err, FactCheckError::Upstream { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        mount_search(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        let err = source_for(&server).search("q").await.unwrap_err();
        assert!(matches!(err, FactCheckError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let source = GoogleFactCheckSource::new(
            "k".to_string(),
            "http://127.0.0.1:1/claims:search".to_string(),
            1,
        )
        .unwrap();

        let err = source.search("q").await.unwrap_err();
        assert!(matches!(err, FactCheckError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_fallback_policy_substitutes_record() {
        let server = MockServer::start().await;
        mount_search(&server, ResponseTemplate::new(502)).await;

        let source = source_for(&server).with_policy(UpstreamErrorPolicy::Fallback);
        let records = source.search("the earth is flat").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "Fallback Fact Checker");
        assert_eq!(records[0].verdict, "Unknown");
        assert_eq!(records[0].claim, "Sample claim related to 'the earth is flat'");
        assert!(records[0].image.is_none());
    }

    #[tokio::test]
    async fn test_no_enricher_skips_page_fetches() {
        let server = MockServer::start().await;
        mount_search(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "claims": [{"text": "a", "claimReview": [{"url": format!("{}/page", server.uri())}]}]
            })),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let records = source_for(&server).search("q").await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].image.is_none());
    }
}
