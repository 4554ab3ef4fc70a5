//! Raw, producer-specific candidate records.
//!
//! A `RawCandidate` is a loose bag of fields. AI search candidates arrive
//! with structured fields already partially parsed (`name`, `title`,
//! `specialty`...), scrape candidates carry page text plus whatever the
//! fetcher could label (`heading`, `title`, `email`...). Every field is
//! optional here; only the normalizer knows how to read either shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::prospect::ProspectSource;

/// An unnormalized record tagged with the discoverer that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    source: ProspectSource,

    #[serde(default)]
    fields: IndexMap<String, Value>,
}

impl RawCandidate {
    /// Create an empty candidate for the given producer.
    pub fn new(source: ProspectSource) -> Self {
        Self {
            source,
            fields: IndexMap::new(),
        }
    }

    /// Build from a JSON object. Non-object values produce an empty candidate.
    pub fn from_json(source: ProspectSource, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => IndexMap::new(),
        };
        Self { source, fields }
    }

    /// Set a field (builder pattern).
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// The discoverer that produced this candidate.
    pub fn source(&self) -> ProspectSource {
        self.source
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Trimmed, non-empty string value of a field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// First non-empty string among several candidate keys.
    pub fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get_str(k))
    }

    /// Trimmed, non-empty string at `object_key.key` (e.g. `contact.email`).
    pub fn nested_str(&self, object_key: &str, key: &str) -> Option<&str> {
        self.fields
            .get(object_key)
            .and_then(Value::as_object)
            .and_then(|o| o.get(key))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String items of a field, whether stored as a single string or an array.
    ///
    /// Non-string array items are skipped.
    pub fn str_list(&self, key: &str) -> Vec<&str> {
        match self.fields.get(key) {
            Some(Value::String(s)) => vec![s.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Every string value in the candidate, depth-first in field order.
    ///
    /// This is the candidate's "raw text" for scoring and for the contact
    /// extractor's fallback scan.
    pub fn all_text(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for value in self.fields.values() {
            collect_strings(value, &mut out);
        }
        out
    }

    /// Whether no field carries any content.
    pub fn is_empty(&self) -> bool {
        self.all_text().iter().all(|s| s.trim().is_empty())
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s.as_str()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}
