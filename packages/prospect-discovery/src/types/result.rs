//! The envelope returned to the caller for every discovery.

use serde::{Deserialize, Serialize};

use crate::types::prospect::{Prospect, ProspectSource};

/// A URL that was excluded from a scrape, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedUrl {
    pub url: String,
    pub reason: String,
}

impl SkippedUrl {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of one discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// False only when the call itself failed outright.
    pub success: bool,

    /// Fresh per call.
    pub discovery_id: String,

    pub source: ProspectSource,

    /// Always `prospects.len()`.
    pub total_found: usize,

    pub prospects: Vec<Prospect>,

    /// Human-readable echo of the resolved query.
    pub search_query_used: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// URLs dropped from a scrape, in input order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedUrl>,
}

impl DiscoveryResult {
    pub fn is_empty(&self) -> bool {
        self.prospects.is_empty()
    }
}
