//! Mock fetcher for testing.
//!
//! Provides canned pages, per-URL failures, and per-URL delays so tests
//! can force fetches to complete out of input order.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, PageFetcher};

/// Failure a [`MockFetcher`] should simulate for one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFetchFailure {
    Timeout,
    Status(u16),
    Empty,
}

/// Mock fetcher for testing.
///
/// ```rust
/// use prospect_discovery::fetchers::MockFetcher;
/// use prospect_discovery::traits::FetchedPage;
///
/// let mock = MockFetcher::new()
///     .with_page(FetchedPage::new("https://example.com", "# Jane Doe"));
/// ```
///
/// URLs with neither a page nor a failure answer with HTTP 404.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, FetchedPage>>>,
    failures: Arc<RwLock<HashMap<String, MockFetchFailure>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

fn key(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page returned for its URL.
    pub fn add_page(&self, page: FetchedPage) {
        self.pages.write().unwrap().insert(key(&page.url), page);
    }

    /// Add a page (builder pattern).
    pub fn with_page(self, page: FetchedPage) -> Self {
        self.add_page(page);
        self
    }

    /// Add a simple page with just URL and content.
    pub fn with_content(self, url: &str, content: &str) -> Self {
        self.with_page(FetchedPage::new(url, content))
    }

    /// Make one URL fail.
    pub fn with_failure(self, url: &str, failure: MockFetchFailure) -> Self {
        self.failures.write().unwrap().insert(key(url), failure);
        self
    }

    /// Delay the answer for one URL.
    pub fn with_delay(self, url: &str, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(key(url), delay);
        self
    }

    /// URLs requested, in the order fetches started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        let k = url.to_string();
        self.calls.write().unwrap().push(k.clone());

        let delay = self.delays.read().unwrap().get(&k).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.failures.read().unwrap().get(&k).copied();
        match failure {
            Some(MockFetchFailure::Timeout) => return Err(FetchError::Timeout { url: k }),
            Some(MockFetchFailure::Status(status)) => {
                return Err(FetchError::Status { url: k, status })
            }
            Some(MockFetchFailure::Empty) => return Err(FetchError::EmptyContent { url: k }),
            None => {}
        }

        let page = self.pages.read().unwrap().get(&k).cloned();
        page.ok_or(FetchError::Status {
            url: k,
            status: 404,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
