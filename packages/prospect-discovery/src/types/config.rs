//! Configuration for discovery runs.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{DiscoveryError, Result};

/// Tunables shared by both discovery modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Maximum URL fetches in flight at once.
    ///
    /// Respects downstream rate limits. Default: 5.
    pub scrape_concurrency: usize,

    /// Maximum URLs accepted in one URL-mode request. Default: 50.
    pub max_urls: usize,

    /// Upper bound for `max_results` in AI mode. Default: 50.
    pub max_results_limit: usize,

    /// `max_results` used when an AI request omits it. Default: 10.
    pub default_max_results: usize,

    /// Per-request timeout for the HTTP fetcher, in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Optional global fetch rate (requests per second).
    ///
    /// None disables the rate limiter; concurrency still applies.
    pub requests_per_second: Option<u32>,

    /// User agent sent by the HTTP fetcher.
    pub user_agent: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            scrape_concurrency: 5,
            max_urls: 50,
            max_results_limit: 50,
            default_max_results: 10,
            fetch_timeout_secs: 30,
            requests_per_second: None,
            user_agent: "ProspectDiscoveryBot/1.0".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first when one exists. Unset variables keep
    /// their defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let config = Self {
            scrape_concurrency: env_or("PROSPECT_SCRAPE_CONCURRENCY", defaults.scrape_concurrency)?,
            max_urls: env_or("PROSPECT_MAX_URLS", defaults.max_urls)?,
            max_results_limit: env_or("PROSPECT_MAX_RESULTS_LIMIT", defaults.max_results_limit)?,
            default_max_results: env_or(
                "PROSPECT_DEFAULT_MAX_RESULTS",
                defaults.default_max_results,
            )?,
            fetch_timeout_secs: env_or("PROSPECT_FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
            requests_per_second: match env::var("PROSPECT_REQUESTS_PER_SECOND") {
                Ok(raw) => Some(parse_var("PROSPECT_REQUESTS_PER_SECOND", &raw)?),
                Err(_) => None,
            },
            user_agent: env::var("PROSPECT_USER_AGENT").unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.scrape_concurrency == 0 {
            return Err(DiscoveryError::Config(
                "scrape_concurrency must be at least 1".into(),
            ));
        }
        if self.max_urls == 0 || self.max_results_limit == 0 {
            return Err(DiscoveryError::Config(
                "max_urls and max_results_limit must be at least 1".into(),
            ));
        }
        if self.default_max_results == 0 || self.default_max_results > self.max_results_limit {
            return Err(DiscoveryError::Config(format!(
                "default_max_results must be within 1..={}",
                self.max_results_limit
            )));
        }
        if self.requests_per_second == Some(0) {
            return Err(DiscoveryError::Config(
                "requests_per_second must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Set fetch concurrency.
    pub fn with_scrape_concurrency(mut self, concurrency: usize) -> Self {
        self.scrape_concurrency = concurrency;
        self
    }

    /// Set the maximum URLs per request.
    pub fn with_max_urls(mut self, max: usize) -> Self {
        self.max_urls = max;
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Enable the fetch rate limiter.
    pub fn with_requests_per_second(mut self, rps: u32) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => parse_var(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| DiscoveryError::Config(format!("{key} must be a valid number, got {raw:?}")))
}
