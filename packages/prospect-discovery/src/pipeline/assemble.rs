//! Builds the caller-facing [`DiscoveryResult`].

use uuid::Uuid;

use crate::types::prospect::{Prospect, ProspectSource};
use crate::types::result::{DiscoveryResult, SkippedUrl};

/// Assembles one discovery call's result.
///
/// The discovery id is minted on construction so it can be logged before
/// the result exists.
#[derive(Debug, Clone)]
pub struct DiscoveryResultAssembler {
    discovery_id: String,
    source: ProspectSource,
    query: String,
    skipped: Vec<SkippedUrl>,
    note: Option<String>,
}

impl DiscoveryResultAssembler {
    pub fn new(source: ProspectSource, query: impl Into<String>) -> Self {
        Self {
            discovery_id: Uuid::new_v4().to_string(),
            source,
            query: query.into(),
            skipped: Vec::new(),
            note: None,
        }
    }

    pub fn discovery_id(&self) -> &str {
        &self.discovery_id
    }

    pub fn with_skipped(mut self, skipped: Vec<SkippedUrl>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Informational message on an otherwise successful result.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// A successful result. `total_found` always equals `prospects.len()`.
    pub fn assemble(self, prospects: Vec<Prospect>) -> DiscoveryResult {
        DiscoveryResult {
            success: true,
            discovery_id: self.discovery_id,
            source: self.source,
            total_found: prospects.len(),
            prospects,
            search_query_used: self.query,
            error: self.note,
            skipped: self.skipped,
        }
    }

    /// A failed result: no prospects, `success == false`, message in `error`.
    pub fn failed(self, error: impl std::fmt::Display) -> DiscoveryResult {
        DiscoveryResult {
            success: false,
            discovery_id: self.discovery_id,
            source: self.source,
            total_found: 0,
            prospects: Vec::new(),
            search_query_used: self.query,
            error: Some(error.to_string()),
            skipped: self.skipped,
        }
    }
}

/// Echo for URL-scrape calls: `"{n} URL(s): u1, u2, ..."`.
pub fn url_echo<S: AsRef<str>>(urls: &[S]) -> String {
    let joined = urls.iter().map(|u| u.as_ref()).collect::<Vec<&str>>().join(", ");
    let noun = if urls.len() == 1 { "URL" } else { "URLs" };
    format!("{} {noun}: {joined}", urls.len())
}
