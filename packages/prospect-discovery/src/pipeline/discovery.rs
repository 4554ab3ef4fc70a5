//! The caller-facing discovery service.
//!
//! Routes a [`DiscoveryRequest`] to the right discoverer, normalizes what
//! comes back, and always answers with a [`DiscoveryResult`]. Invalid
//! requests, provider outages and cancellation all become
//! `success == false` results rather than errors.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::DiscoveryError;
use crate::pipeline::ai_search::{build_search_query, AiSearchDiscoverer};
use crate::pipeline::assemble::{url_echo, DiscoveryResultAssembler};
use crate::pipeline::normalize::ProspectNormalizer;
use crate::pipeline::score::ScoringCriteria;
use crate::pipeline::url_scrape::UrlScrapeDiscoverer;
use crate::traits::fetcher::PageFetcher;
use crate::traits::searcher::ProspectSearcher;
use crate::types::config::DiscoveryConfig;
use crate::types::prospect::ProspectSource;
use crate::types::request::{AiSearchRequest, DiscoveryRequest, UrlScrapeRequest};
use crate::types::result::DiscoveryResult;

/// Prospect discovery over an AI searcher and a page fetcher.
///
/// ```rust,no_run
/// use prospect_discovery::{ProspectDiscovery, AiSearchRequest};
/// use prospect_discovery::testing::{MockFetcher, MockSearcher};
///
/// # async fn example() {
/// let discovery = ProspectDiscovery::new(MockSearcher::new(), MockFetcher::new());
/// let request = AiSearchRequest::new("user-1", "Educational Consultant", "Washington DC");
/// let result = discovery.discover(&request.into()).await;
/// assert!(result.success);
/// # }
/// ```
pub struct ProspectDiscovery<S, F> {
    searcher: AiSearchDiscoverer<S>,
    scraper: UrlScrapeDiscoverer<F>,
    config: DiscoveryConfig,
}

impl<S: ProspectSearcher, F: PageFetcher> ProspectDiscovery<S, F> {
    /// Create with the default configuration.
    pub fn new(searcher: S, fetcher: F) -> Self {
        let config = DiscoveryConfig::default();
        Self {
            searcher: AiSearchDiscoverer::new(searcher),
            scraper: UrlScrapeDiscoverer::new(fetcher).with_concurrency(config.scrape_concurrency),
            config,
        }
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.scraper = self.scraper.with_concurrency(config.scrape_concurrency);
        self.config = config;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Run one discovery request to completion.
    pub async fn discover(&self, request: &DiscoveryRequest) -> DiscoveryResult {
        self.discover_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Run one discovery request, giving up when `cancel` fires.
    pub async fn discover_with_cancel(
        &self,
        request: &DiscoveryRequest,
        cancel: &CancellationToken,
    ) -> DiscoveryResult {
        match request {
            DiscoveryRequest::AiSearch(request) => self.search(request, cancel).await,
            DiscoveryRequest::UrlScrape(request) => self.scrape(request, cancel).await,
        }
    }

    /// AI-search mode.
    pub async fn search(
        &self,
        request: &AiSearchRequest,
        cancel: &CancellationToken,
    ) -> DiscoveryResult {
        let context = request.context();
        let query = build_search_query(&request.specialty, &request.location, context);
        let assembler = DiscoveryResultAssembler::new(ProspectSource::AiSearch, query.as_str());
        let discovery_id = assembler.discovery_id().to_string();

        if let Err(e) = request.validate(&self.config) {
            warn!(discovery_id = %discovery_id, user_id = %request.user_id, error = %e, "Rejected AI search request");
            return assembler.failed(e);
        }
        let max_results = request.max_results_or_default(&self.config);

        info!(
            discovery_id = %discovery_id,
            user_id = %request.user_id,
            source = %ProspectSource::AiSearch,
            query = %query,
            max_results,
            "Starting prospect discovery"
        );

        if cancel.is_cancelled() {
            return cancelled(assembler, &discovery_id);
        }

        let outcome = match self
            .searcher
            .discover(&request.specialty, &request.location, context, max_results)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(discovery_id = %discovery_id, error = %e, "Prospect discovery failed");
                return assembler.failed(e);
            }
        };

        let normalizer = ProspectNormalizer::new(ScoringCriteria::new(
            &request.specialty,
            &request.location,
            context,
        ));
        let mut prospects = match normalizer.normalize_all(&outcome.candidates, cancel) {
            Ok(prospects) => prospects,
            Err(_) => return cancelled(assembler, &discovery_id),
        };
        prospects.truncate(max_results);

        for partial in &outcome.partial_errors {
            warn!(discovery_id = %discovery_id, error = %partial, "Unreadable provider record");
        }

        info!(
            discovery_id = %discovery_id,
            candidates = outcome.candidates.len(),
            prospects = prospects.len(),
            "Prospect discovery complete"
        );

        if outcome.partial_errors.is_empty() {
            assembler.assemble(prospects)
        } else {
            let unreadable = outcome.partial_errors.len();
            assembler
                .with_note(format!("{unreadable} provider record(s) could not be read"))
                .assemble(prospects)
        }
    }

    /// URL-scrape mode.
    pub async fn scrape(
        &self,
        request: &UrlScrapeRequest,
        cancel: &CancellationToken,
    ) -> DiscoveryResult {
        let assembler = DiscoveryResultAssembler::new(ProspectSource::UrlScrape, url_echo(&request.urls));
        let discovery_id = assembler.discovery_id().to_string();

        let urls = match request.validate(&self.config) {
            Ok(urls) => urls,
            Err(e) => {
                warn!(discovery_id = %discovery_id, user_id = %request.user_id, error = %e, "Rejected URL scrape request");
                return assembler.failed(e);
            }
        };

        info!(
            discovery_id = %discovery_id,
            user_id = %request.user_id,
            source = %ProspectSource::UrlScrape,
            url_count = urls.len(),
            fetcher = self.scraper.fetcher().name(),
            "Starting prospect discovery"
        );

        let outcome = match self.scraper.discover(&urls, cancel).await {
            Ok(outcome) => outcome,
            Err(_) => return cancelled(assembler, &discovery_id),
        };

        let normalizer = ProspectNormalizer::new(ScoringCriteria::none());
        let prospects = match normalizer.normalize_all(&outcome.candidates, cancel) {
            Ok(prospects) => prospects,
            Err(_) => return cancelled(assembler, &discovery_id),
        };

        let mut assembler = assembler.with_skipped(outcome.skipped.clone());
        if outcome.all_failed() {
            warn!(discovery_id = %discovery_id, url_count = urls.len(), "Every URL failed to fetch");
            assembler = assembler.with_note(format!(
                "all {} URL(s) failed to fetch",
                urls.len()
            ));
        }

        info!(
            discovery_id = %discovery_id,
            fetched = outcome.candidates.len(),
            skipped = outcome.skipped.len(),
            prospects = prospects.len(),
            "Prospect discovery complete"
        );

        assembler.assemble(prospects)
    }
}

fn cancelled(assembler: DiscoveryResultAssembler, discovery_id: &str) -> DiscoveryResult {
    info!(discovery_id = %discovery_id, "Prospect discovery cancelled");
    assembler.failed(DiscoveryError::Cancelled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::MockFetcher;
    use crate::traits::searcher::{MockSearchFailure, MockSearcher};
    use serde_json::json;

    fn service(searcher: MockSearcher) -> ProspectDiscovery<MockSearcher, MockFetcher> {
        ProspectDiscovery::new(searcher, MockFetcher::new())
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_provider() {
        let searcher = MockSearcher::new();
        let discovery = service(searcher.clone());

        let request = AiSearchRequest::new("user-1", "", "Washington DC");
        let result = discovery.discover(&request.into()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("specialty"));
        assert_eq!(searcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_failed_result() {
        let discovery = service(MockSearcher::new().failing(MockSearchFailure::Unavailable));
        let request = AiSearchRequest::new("user-1", "Tutor", "DC");
        let result = discovery.discover(&request.into()).await;

        assert!(!result.success);
        assert_eq!(result.total_found, 0);
        assert_eq!(result.search_query_used, "Tutor in DC");
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_search_scores_against_request() {
        let searcher = MockSearcher::new().with_fallback(vec![json!({
            "name": "Jane Doe",
            "specialty": "Tutor",
            "location": "DC",
            "source_url": "https://a.com/jane"
        })]);
        let request = AiSearchRequest::new("user-1", "Tutor", "DC");
        let result = service(searcher).discover(&request.into()).await;

        assert!(result.success);
        assert_eq!(result.prospects[0].fit_score, 85);
    }

    #[tokio::test]
    async fn test_omitted_max_results_uses_configured_default() {
        let records = (1..=8)
            .map(|i| json!({"name": format!("Tutor {i}"), "source_url": format!("https://t{i}.com")}))
            .collect();
        let searcher = MockSearcher::new().with_fallback(records);
        let config = DiscoveryConfig {
            default_max_results: 3,
            ..DiscoveryConfig::default()
        };
        let discovery = service(searcher.clone()).with_config(config);

        let request: DiscoveryRequest = serde_json::from_value(json!({
            "mode": "ai_search",
            "user_id": "user-1",
            "specialty": "Tutor",
            "location": "DC"
        }))
        .unwrap();
        let result = discovery.discover(&request).await;

        assert!(result.success);
        assert_eq!(searcher.calls(), vec![("Tutor in DC".to_string(), 3)]);
        assert_eq!(result.total_found, 3);
    }

    #[tokio::test]
    async fn test_unreadable_records_noted_on_result() {
        let searcher = MockSearcher::new().with_fallback(vec![
            json!({"name": "Jane Doe", "source_url": "https://a.com/jane"}),
            json!("Jane Doe, tutor"),
            json!(42),
        ]);
        let request = AiSearchRequest::new("user-1", "Tutor", "DC");
        let result = service(searcher).discover(&request.into()).await;

        assert!(result.success);
        assert_eq!(result.total_found, 1);
        assert_eq!(
            result.error.as_deref(),
            Some("2 provider record(s) could not be read")
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_search() {
        let searcher = MockSearcher::new();
        let discovery = service(searcher.clone());
        let token = CancellationToken::new();
        token.cancel();

        let request = AiSearchRequest::new("user-1", "Tutor", "DC");
        let result = discovery.discover_with_cancel(&request.into(), &token).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("discovery cancelled"));
        assert_eq!(searcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_with_config_sets_concurrency() {
        let discovery = service(MockSearcher::new())
            .with_config(DiscoveryConfig::default().with_scrape_concurrency(2));
        assert_eq!(discovery.scraper.concurrency(), 2);
        assert_eq!(discovery.config().scrape_concurrency, 2);
    }
}
