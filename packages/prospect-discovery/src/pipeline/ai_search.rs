//! AI-search discoverer: one provider call per request.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::traits::searcher::ProspectSearcher;
use crate::types::candidate::RawCandidate;
use crate::types::prospect::ProspectSource;

/// The query string sent to the provider and echoed back to the caller.
///
/// `"{specialty} in {location}"`, with ` ({context})` appended when the
/// trimmed context is non-empty.
pub fn build_search_query(specialty: &str, location: &str, context: Option<&str>) -> String {
    let base = format!("{} in {}", specialty.trim(), location.trim());
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("{base} ({context})"),
        None => base,
    }
}

/// What one AI search produced.
#[derive(Debug, Clone, Default)]
pub struct AiSearchOutcome {
    /// At most `max_results`, in provider order
    pub candidates: Vec<RawCandidate>,

    /// Records that could not be read as candidates
    pub partial_errors: Vec<String>,
}

pub struct AiSearchDiscoverer<S> {
    searcher: S,
}

impl<S: ProspectSearcher> AiSearchDiscoverer<S> {
    pub fn new(searcher: S) -> Self {
        Self { searcher }
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    /// Ask the provider once and tag its records as AI-search candidates.
    ///
    /// Provider failures are returned as `DiscoveryError::Provider`; there
    /// is no retry. Records are neither deduplicated nor scored here.
    pub async fn discover(
        &self,
        specialty: &str,
        location: &str,
        context: Option<&str>,
        max_results: usize,
    ) -> Result<AiSearchOutcome> {
        let query = build_search_query(specialty, location, context);

        let records = self
            .searcher
            .search(&query, max_results)
            .await
            .inspect_err(|e| {
                warn!(provider = self.searcher.name(), error = %e, "AI search failed");
            })?;

        let returned = records.len();
        let mut outcome = AiSearchOutcome::default();
        for (position, record) in records.into_iter().enumerate() {
            match record {
                Value::Object(_) => outcome
                    .candidates
                    .push(RawCandidate::from_json(ProspectSource::AiSearch, record)),
                other => outcome.partial_errors.push(format!(
                    "record {position} is not an object (got {})",
                    json_kind(&other)
                )),
            }
        }
        outcome.candidates.truncate(max_results);

        debug!(
            provider = self.searcher.name(),
            returned,
            kept = outcome.candidates.len(),
            skipped = outcome.partial_errors.len(),
            "AI search complete"
        );

        Ok(outcome)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
