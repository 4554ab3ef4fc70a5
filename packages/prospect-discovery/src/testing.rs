//! Testing utilities.
//!
//! Mock collaborators plus a scenario builder, so applications embedding
//! the discovery core can test without a search provider or network.

use serde_json::{json, Value};
use std::time::Duration;

pub use crate::fetchers::{MockFetchFailure, MockFetcher};
pub use crate::traits::fetcher::FetchedPage;
pub use crate::traits::searcher::{MockSearchFailure, MockSearcher};

use crate::pipeline::ProspectDiscovery;
use crate::types::config::DiscoveryConfig;

/// An AI-search record with the fields most providers return.
pub fn ai_record(name: &str, specialty: &str, location: &str, source_url: &str) -> Value {
    json!({
        "name": name,
        "specialty": specialty,
        "location": location,
        "source_url": source_url,
    })
}

/// A scraped profile page with a heading and body text.
pub fn profile_page(url: &str, heading: &str, body: &str) -> FetchedPage {
    FetchedPage::new(url, body)
        .with_title(format!("{heading} | Profile"))
        .with_field("heading", heading)
}

/// Builder for a discovery service wired to mocks.
pub struct TestScenario {
    searcher: MockSearcher,
    fetcher: MockFetcher,
    config: DiscoveryConfig,
}

impl TestScenario {
    pub fn new() -> Self {
        Self {
            searcher: MockSearcher::new(),
            fetcher: MockFetcher::new(),
            config: DiscoveryConfig::default(),
        }
    }

    /// Records returned for any AI query.
    pub fn with_search_results(mut self, records: Vec<Value>) -> Self {
        self.searcher = self.searcher.with_fallback(records);
        self
    }

    pub fn with_search_failure(mut self, failure: MockSearchFailure) -> Self {
        self.searcher = self.searcher.failing(failure);
        self
    }

    pub fn with_page(mut self, page: FetchedPage) -> Self {
        self.fetcher = self.fetcher.with_page(page);
        self
    }

    pub fn with_fetch_failure(mut self, url: &str, failure: MockFetchFailure) -> Self {
        self.fetcher = self.fetcher.with_failure(url, failure);
        self
    }

    pub fn with_fetch_delay(mut self, url: &str, delay: Duration) -> Self {
        self.fetcher = self.fetcher.with_delay(url, delay);
        self
    }

    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// The service plus handles to its mocks for call assertions.
    pub fn build(self) -> (ProspectDiscovery<MockSearcher, MockFetcher>, MockSearcher, MockFetcher) {
        let discovery = ProspectDiscovery::new(self.searcher.clone(), self.fetcher.clone())
            .with_config(self.config);
        (discovery, self.searcher, self.fetcher)
    }
}

impl Default for TestScenario {
    fn default() -> Self {
        Self::new()
    }
}
