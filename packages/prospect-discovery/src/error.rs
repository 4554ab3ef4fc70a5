//! Typed errors for prospect discovery.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on what went wrong. None of these escape [`ProspectDiscovery`]: the
//! caller-facing operations fold every failure into a `DiscoveryResult`.
//!
//! [`ProspectDiscovery`]: crate::pipeline::ProspectDiscovery

use thiserror::Error;

/// Errors that fail a whole discovery call.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The request was rejected before any discoverer ran
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// AI search provider failed outright
    #[error("search provider failed: {0}")]
    Provider(#[from] SearchError),

    /// Caller abandoned the request
    #[error("discovery cancelled")]
    Cancelled,

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl DiscoveryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Failures reported by the AI search collaborator.
///
/// All of them are terminal for the call; nothing inside the core retries.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Provider is down or returned a server error
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Quota or rate limit exhausted
    #[error("provider rate limit or quota exceeded")]
    RateLimited,

    /// Credentials rejected
    #[error("provider rejected credentials")]
    Unauthorized,

    /// Provider did not answer in time
    #[error("provider timed out")]
    Timeout,

    /// Response body could not be understood
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors for a single URL fetch. Always recoverable at the batch level.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Security validation failed
    #[error("security error: {0}")]
    Security(#[from] SecurityError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status code
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Page fetched but nothing extractable came back
    #[error("no extractable content at: {url}")]
    EmptyContent { url: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimitExceeded,
}

/// Security-related errors, primarily for SSRF protection.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// URL scheme not allowed (e.g., file://, ftp://)
    #[error("disallowed URL scheme: {0}")]
    DisallowedScheme(String),

    /// Host is blocked (e.g., localhost, internal IPs)
    #[error("blocked host: {0}")]
    BlockedHost(String),

    /// IP in blocked CIDR range (e.g., 10.0.0.0/8)
    #[error("blocked IP range: {0}")]
    BlockedCidr(String),

    /// URL has no host
    #[error("URL has no host")]
    NoHost,

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    DnsResolution(String),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Result type alias for search provider calls.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for page fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for security operations.
pub type SecurityResult<T> = std::result::Result<T, SecurityError>;
