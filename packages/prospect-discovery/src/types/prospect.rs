//! Canonical prospect record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which discoverer produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectSource {
    /// Semantic search through the AI search collaborator
    AiSearch,
    /// Direct fetch of caller-supplied URLs
    UrlScrape,
}

impl ProspectSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiSearch => "ai_search",
            Self::UrlScrape => "url_scrape",
        }
    }
}

impl fmt::Display for ProspectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact details found for a prospect.
///
/// Every field is independent and optional. Missing means "not found",
/// never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// The prospect's own site. Never the page they were found on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ContactInfo {
    /// Number of contact fields present.
    pub fn filled_count(&self) -> usize {
        [&self.email, &self.phone, &self.website]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }
}

/// A normalized person or organization matching a discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prospect {
    /// Never empty; trimmed with inner whitespace collapsed.
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Distinct, trimmed, non-empty entries in first-seen order.
    #[serde(default)]
    pub specialty: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Page or record the data was derived from.
    pub source_url: String,

    pub source: ProspectSource,

    #[serde(default)]
    pub contact: ContactInfo,

    /// Heuristic relevance in `0..=100`.
    pub fit_score: u8,
}

impl Prospect {
    /// Key used to decide whether two records describe the same prospect:
    /// case-folded, whitespace-collapsed name plus source host.
    pub fn dedupe_key(&self) -> (String, String) {
        (fold_name(&self.name), source_host(&self.source_url))
    }
}

/// Lowercase and collapse whitespace runs to a single space.
pub fn fold_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Host of a source URL, lowercased. Falls back to the trimmed raw string
/// when it does not parse as a URL with a host.
pub fn source_host(source_url: &str) -> String {
    url::Url::parse(source_url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_lowercase()))
        .unwrap_or_else(|| source_url.trim().to_lowercase())
}
