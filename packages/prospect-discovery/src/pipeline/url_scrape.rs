//! URL-scrape discoverer.
//!
//! Fetches every URL with bounded concurrency, lets individual URLs fail
//! without failing the batch, and emits candidates in input order no matter
//! which fetch finishes first.

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::error::{DiscoveryError, FetchResult, Result};
use crate::traits::fetcher::{FetchedPage, PageFetcher};
use crate::types::candidate::RawCandidate;
use crate::types::prospect::ProspectSource;
use crate::types::result::SkippedUrl;

/// Default number of fetches in flight.
pub const DEFAULT_SCRAPE_CONCURRENCY: usize = 5;

/// Candidates in input order plus the URLs that produced none.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub candidates: Vec<RawCandidate>,
    pub skipped: Vec<SkippedUrl>,
}

impl ScrapeOutcome {
    /// Every URL failed.
    pub fn all_failed(&self) -> bool {
        self.candidates.is_empty() && !self.skipped.is_empty()
    }
}

pub struct UrlScrapeDiscoverer<F> {
    fetcher: F,
    concurrency: usize,
}

impl<F: PageFetcher> UrlScrapeDiscoverer<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            concurrency: DEFAULT_SCRAPE_CONCURRENCY,
        }
    }

    /// Cap fetches in flight. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch each URL and turn each page into one candidate.
    ///
    /// Per-URL failures become `skipped` entries. Once `cancel` fires no new
    /// fetch starts; fetches already in flight finish and are discarded, and
    /// the call returns `DiscoveryError::Cancelled`.
    pub async fn discover(
        &self,
        urls: &[Url],
        cancel: &CancellationToken,
    ) -> Result<ScrapeOutcome> {
        let fetcher = &self.fetcher;

        // One slot per input URL; completion order does not matter
        let mut slots: Vec<Option<FetchResult<FetchedPage>>> = Vec::new();
        slots.resize_with(urls.len(), || None);

        let mut fetches = stream::iter(urls.iter().enumerate())
            .map(move |(index, url)| async move {
                if cancel.is_cancelled() {
                    return (index, None);
                }
                debug!(url = %url, "Fetching page");
                (index, Some(fetcher.fetch(url).await))
            })
            .buffer_unordered(self.concurrency);

        while let Some((index, result)) = fetches.next().await {
            slots[index] = result;
        }

        if cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled);
        }

        let mut outcome = ScrapeOutcome::default();
        for (url, slot) in urls.iter().zip(slots) {
            match slot {
                Some(Ok(page)) if page.has_content() => {
                    outcome.candidates.push(page_to_candidate(url, page));
                }
                Some(Ok(_)) => {
                    warn!(url = %url, "Page had no content");
                    outcome
                        .skipped
                        .push(SkippedUrl::new(url.as_str(), "page had no content"));
                }
                Some(Err(e)) => {
                    warn!(url = %url, error = %e, "Failed to fetch page");
                    outcome.skipped.push(SkippedUrl::new(url.as_str(), e.to_string()));
                }
                None => {
                    outcome
                        .skipped
                        .push(SkippedUrl::new(url.as_str(), "not fetched"));
                }
            }
        }

        debug!(
            requested = urls.len(),
            fetched = outcome.candidates.len(),
            skipped = outcome.skipped.len(),
            "URL scrape complete"
        );

        Ok(outcome)
    }
}

/// One page becomes one scrape candidate.
///
/// `source_url` is always the URL that was requested, even when the fetcher
/// reports a different (redirected) one.
pub fn page_to_candidate(url: &Url, page: FetchedPage) -> RawCandidate {
    let mut candidate = RawCandidate::new(ProspectSource::UrlScrape);
    for (key, value) in page.fields {
        candidate.insert(key, value);
    }
    if let Some(title) = page.title {
        candidate.insert("title", title);
    }
    candidate.insert("text", page.content);
    candidate.insert("source_url", url.as_str());
    candidate
}
