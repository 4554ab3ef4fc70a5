//! Page fetcher implementations.
//!
//! - [`HttpPageFetcher`] - plain HTTP + regex HTML extraction
//! - [`RateLimitedFetcher`] - governor quota around any fetcher
//! - [`MockFetcher`] - canned pages for testing

pub mod http;
pub mod mock;
pub mod rate_limited;

use std::num::NonZeroU32;
use std::sync::Arc;

pub use http::HttpPageFetcher;
pub use mock::{MockFetchFailure, MockFetcher};
pub use rate_limited::{FetcherExt, RateLimitedFetcher};

use crate::error::{DiscoveryError, Result};
use crate::traits::fetcher::{PageFetcher, ValidatedFetcher};
use crate::types::config::DiscoveryConfig;

/// Production fetcher stack for a config: HTTP, SSRF validation, and a rate
/// limiter when `requests_per_second` is set.
pub fn build_default_fetcher(config: &DiscoveryConfig) -> Result<Arc<dyn PageFetcher>> {
    config.validate()?;

    let http = HttpPageFetcher::from_config(config)
        .map_err(|e| DiscoveryError::Config(format!("failed to build HTTP client: {e}")))?;
    let validated = ValidatedFetcher::new(http);

    match config.requests_per_second.and_then(NonZeroU32::new) {
        Some(rps) => Ok(Arc::new(validated.rate_limited(rps))),
        None => Ok(Arc::new(validated)),
    }
}
