//! AI search collaborator.
//!
//! The provider owns ranking and retrieval; this crate only hands it one
//! composite query and a result cap, and gets back loosely structured
//! records. Implementations:
//!
//! - `TavilyProspectSearcher` - Tavily search API
//! - `MockSearcher` - For testing
//!
//! ```rust,ignore
//! let searcher = TavilyProspectSearcher::new(api_key);
//! let records = searcher.search("educational consultant in Washington DC", 10).await?;
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{SearchError, SearchResult};

/// Semantic search over people and organizations.
///
/// Any error is a provider-level failure for the whole call. The core
/// never retries; retry policy belongs to the implementation or the caller.
#[async_trait]
pub trait ProspectSearcher: Send + Sync {
    /// Run one search. Each returned record is a JSON object with whatever
    /// fields the provider could fill; non-object records are ignored
    /// downstream. Providers may return more than `max_results`.
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<Value>>;

    /// Get the searcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: ProspectSearcher + ?Sized> ProspectSearcher for Arc<T> {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<Value>> {
        (**self).search(query, max_results).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Failure a [`MockSearcher`] should simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSearchFailure {
    Unavailable,
    RateLimited,
    Timeout,
}

impl From<MockSearchFailure> for SearchError {
    fn from(failure: MockSearchFailure) -> Self {
        match failure {
            MockSearchFailure::Unavailable => {
                SearchError::Unavailable("mock provider offline".to_string())
            }
            MockSearchFailure::RateLimited => SearchError::RateLimited,
            MockSearchFailure::Timeout => SearchError::Timeout,
        }
    }
}

/// Mock searcher for testing.
///
/// Returns canned records per query (or a fallback set for any query) and
/// records every call. Deliberately ignores `max_results` so callers'
/// capping can be tested.
#[derive(Default, Clone)]
pub struct MockSearcher {
    by_query: Arc<RwLock<HashMap<String, Vec<Value>>>>,
    fallback: Arc<RwLock<Vec<Value>>>,
    failure: Arc<RwLock<Option<MockSearchFailure>>>,
    calls: Arc<RwLock<Vec<(String, usize)>>>,
}

impl MockSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add results for an exact query.
    pub fn with_results(self, query: &str, records: Vec<Value>) -> Self {
        self.by_query
            .write()
            .unwrap()
            .insert(query.to_string(), records);
        self
    }

    /// Results returned for any query without an exact entry.
    pub fn with_fallback(self, records: Vec<Value>) -> Self {
        *self.fallback.write().unwrap() = records;
        self
    }

    /// Make every call fail.
    pub fn failing(self, failure: MockSearchFailure) -> Self {
        *self.failure.write().unwrap() = Some(failure);
        self
    }

    /// Queries and caps received, in call order.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl ProspectSearcher for MockSearcher {
    async fn search(&self, query: &str, max_results: usize) -> SearchResult<Vec<Value>> {
        self.calls
            .write()
            .unwrap()
            .push((query.to_string(), max_results));

        if let Some(failure) = *self.failure.read().unwrap() {
            return Err(failure.into());
        }

        let exact = self.by_query.read().unwrap().get(query).cloned();
        Ok(exact.unwrap_or_else(|| self.fallback.read().unwrap().clone()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
