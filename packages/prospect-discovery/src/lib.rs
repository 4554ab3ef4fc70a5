//! Prospect Discovery Library
//!
//! Finds people who might become clients of a professional-services
//! business and returns them as normalized, scored, deduplicated
//! prospect records.
//!
//! Two ways in:
//!
//! - **AI search**: a specialty + location (+ optional context) becomes one
//!   query to an AI search provider
//! - **URL scrape**: a caller-supplied list of pages, fetched concurrently,
//!   one candidate per page
//!
//! Both converge on the same pipeline: contact extraction, fit scoring,
//! name/host deduplication, and a single [`DiscoveryResult`] per call.
//! Failures never escape as errors; they come back as `success == false`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prospect_discovery::{AiSearchRequest, DiscoveryConfig, ProspectDiscovery};
//! use prospect_discovery::fetchers::build_default_fetcher;
//! use prospect_discovery::searchers::TavilyProspectSearcher;
//!
//! let config = DiscoveryConfig::from_env()?;
//! let searcher = TavilyProspectSearcher::from_env()?;
//! let fetcher = build_default_fetcher(&config)?;
//! let discovery = ProspectDiscovery::new(searcher, fetcher).with_config(config);
//!
//! let request = AiSearchRequest::new("user-1", "Educational Consultant", "Washington DC")
//!     .with_context("works with high school students")
//!     .with_max_results(5);
//! let result = discovery.discover(&request.into()).await;
//! ```
//!
//! # Modules
//!
//! - [`types`] - Requests, prospects, results, configuration
//! - [`traits`] - Collaborator seams (ProspectSearcher, PageFetcher)
//! - [`pipeline`] - Discoverers, normalization, scoring, assembly
//! - [`fetchers`] - HTTP, rate-limited and mock page fetchers
//! - [`searchers`] - AI search provider implementations
//! - [`security`] - Credential handling and SSRF protection
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod searchers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{DiscoveryError, FetchError, SearchError, SecurityError};
pub use pipeline::{
    build_search_query, dedupe_prospects, AiSearchDiscoverer, ContactExtractor,
    DiscoveryResultAssembler, FitScorer, ProspectDiscovery, ProspectNormalizer, ScoringCriteria,
    UrlScrapeDiscoverer,
};
pub use traits::{FetchedPage, PageFetcher, ProspectSearcher, ValidatedFetcher};
pub use types::{
    candidate::RawCandidate,
    config::DiscoveryConfig,
    prospect::{ContactInfo, Prospect, ProspectSource},
    request::{AiSearchRequest, DiscoveryRequest, UrlScrapeRequest},
    result::{DiscoveryResult, SkippedUrl},
};
