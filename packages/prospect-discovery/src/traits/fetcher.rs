//! Page-fetch/extract collaborator.
//!
//! A fetcher turns one URL into page text plus whatever fields it could
//! label (headline, `mailto:` address, explicit homepage link...). How it
//! scrapes is its own business. Every failure is per URL: the scrape
//! discoverer records it and moves on.
//!
//! # SSRF Protection
//!
//! Always wrap network fetchers with `ValidatedFetcher` in production:
//!
//! ```rust,ignore
//! let fetcher = ValidatedFetcher::new(HttpPageFetcher::new());
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::security::UrlValidator;

/// Raw result of fetching one page, before it becomes a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedPage {
    /// Requested URL (not the post-redirect one)
    pub url: String,

    /// Page text (markdown or plain text)
    pub content: String,

    /// `<title>` if available
    pub title: Option<String>,

    /// Labelled values the fetcher could pick out, e.g. `heading`,
    /// `email`, `phone`, `website`, `site_name`
    #[serde(default)]
    pub fields: IndexMap<String, String>,

    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Create a new page with minimal fields.
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            title: None,
            fields: IndexMap::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a labelled field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Check if this page has any content at all.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
            || self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
            || !self.fields.is_empty()
    }
}

/// Fetch and extract a single page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one URL. Timeouts, 4xx/5xx and unparsable content are errors.
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage>;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        (**self).fetch(url).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A fetcher that validates URLs before fetching (SSRF protection).
pub struct ValidatedFetcher<F: PageFetcher> {
    inner: F,
    validator: UrlValidator,
}

impl<F: PageFetcher> ValidatedFetcher<F> {
    /// Create a new validated fetcher with default security rules.
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: fetcher,
            validator: UrlValidator::new(),
        }
    }

    /// Create with a custom validator.
    pub fn with_validator(fetcher: F, validator: UrlValidator) -> Self {
        Self {
            inner: fetcher,
            validator,
        }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for ValidatedFetcher<F> {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        self.validator
            .validate_with_dns(url)
            .await
            .map_err(FetchError::Security)?;

        self.inner.fetch(url).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
