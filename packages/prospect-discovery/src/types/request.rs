//! Discovery requests and their validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

use crate::error::{DiscoveryError, Result};
use crate::types::config::DiscoveryConfig;
use crate::types::prospect::ProspectSource;

/// One user action asking for prospects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiscoveryRequest {
    AiSearch(AiSearchRequest),
    UrlScrape(UrlScrapeRequest),
}

impl DiscoveryRequest {
    /// Opaque requester id, used only for attribution.
    pub fn user_id(&self) -> &str {
        match self {
            Self::AiSearch(r) => &r.user_id,
            Self::UrlScrape(r) => &r.user_id,
        }
    }

    /// The discoverer this request is routed to.
    pub fn source(&self) -> ProspectSource {
        match self {
            Self::AiSearch(_) => ProspectSource::AiSearch,
            Self::UrlScrape(_) => ProspectSource::UrlScrape,
        }
    }
}

impl From<AiSearchRequest> for DiscoveryRequest {
    fn from(request: AiSearchRequest) -> Self {
        Self::AiSearch(request)
    }
}

impl From<UrlScrapeRequest> for DiscoveryRequest {
    fn from(request: UrlScrapeRequest) -> Self {
        Self::UrlScrape(request)
    }
}

/// Semantic search for prospects by specialty and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSearchRequest {
    pub user_id: String,

    pub specialty: String,

    pub location: String,

    /// Free text; no structural validation. Blank is treated as absent.
    #[serde(default)]
    pub additional_context: Option<String>,

    /// Cap on emitted candidates, `1..=max_results_limit`. Absent means
    /// the configured `default_max_results`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl AiSearchRequest {
    /// Create a request that uses the configured result cap.
    pub fn new(
        user_id: impl Into<String>,
        specialty: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            specialty: specialty.into(),
            location: location.into(),
            additional_context: None,
            max_results: None,
        }
    }

    /// Add free-text context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    /// Set the result cap.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// The cap this request runs with under `config`.
    pub fn max_results_or_default(&self, config: &DiscoveryConfig) -> usize {
        self.max_results.unwrap_or(config.default_max_results)
    }

    /// Context with surrounding whitespace removed, if any remains.
    pub fn context(&self) -> Option<&str> {
        self.additional_context
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Reject the request before any search runs.
    pub fn validate(&self, config: &DiscoveryConfig) -> Result<()> {
        require_user(&self.user_id)?;
        if self.specialty.trim().is_empty() {
            return Err(DiscoveryError::invalid("specialty is required"));
        }
        if self.location.trim().is_empty() {
            return Err(DiscoveryError::invalid("location is required"));
        }
        let max_results = self.max_results_or_default(config);
        if max_results == 0 || max_results > config.max_results_limit {
            return Err(DiscoveryError::invalid(format!(
                "max_results must be between 1 and {}, got {}",
                config.max_results_limit, max_results
            )));
        }
        Ok(())
    }
}

/// Direct scrape of caller-supplied pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlScrapeRequest {
    pub user_id: String,

    pub urls: Vec<String>,
}

impl UrlScrapeRequest {
    pub fn new(user_id: impl Into<String>, urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            user_id: user_id.into(),
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Validate and return the parsed URLs, deduplicated in first-seen order.
    ///
    /// Every entry must be an absolute http(s) URL with a host; a single bad
    /// entry rejects the whole request.
    pub fn validate(&self, config: &DiscoveryConfig) -> Result<Vec<Url>> {
        require_user(&self.user_id)?;
        if self.urls.is_empty() {
            return Err(DiscoveryError::invalid("at least one URL is required"));
        }

        let mut seen = HashSet::new();
        let mut parsed = Vec::with_capacity(self.urls.len());
        for raw in &self.urls {
            let url = parse_absolute_url(raw)?;
            if seen.insert(url.as_str().to_string()) {
                parsed.push(url);
            }
        }

        if parsed.len() > config.max_urls {
            return Err(DiscoveryError::invalid(format!(
                "at most {} URLs are allowed, got {}",
                config.max_urls,
                parsed.len()
            )));
        }

        Ok(parsed)
    }
}

fn require_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(DiscoveryError::invalid("user_id is required"));
    }
    Ok(())
}

fn parse_absolute_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DiscoveryError::invalid(format!("malformed URL {raw:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DiscoveryError::invalid(format!(
            "URL {raw:?} must use http or https"
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(DiscoveryError::invalid(format!("URL {raw:?} has no host")));
    }
    Ok(url)
}
