//! Raw candidate -> `Prospect` normalization and deduplication.
//!
//! Each source has its own field names, so a small adapter reads a
//! [`RawCandidate`] into a common view first. From there the path is the
//! same for both modes: extract contact, score, tidy name and specialty,
//! then dedupe.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::pipeline::contact::ContactExtractor;
use crate::pipeline::score::{FitScorer, ScoreInput, ScoringCriteria};
use crate::types::candidate::RawCandidate;
use crate::types::prospect::{Prospect, ProspectSource};

/// Separators that end the name part of a page title or heading.
const TITLE_SEPARATORS: &[&str] = &[" | ", " - ", " – ", " — ", " :: "];

/// A source-independent reading of a raw candidate.
#[derive(Debug, Default)]
struct CandidateView<'a> {
    name: Option<String>,
    title: Option<&'a str>,
    organization: Option<&'a str>,
    specialty: Vec<&'a str>,
    location: Option<&'a str>,
    source_url: Option<&'a str>,
}

impl<'a> CandidateView<'a> {
    fn read(candidate: &'a RawCandidate) -> Self {
        match candidate.source() {
            ProspectSource::AiSearch => Self::from_ai(candidate),
            ProspectSource::UrlScrape => Self::from_scrape(candidate),
        }
    }

    fn from_ai(c: &'a RawCandidate) -> Self {
        let name = c
            .first_str(&["name", "full_name"])
            .map(str::to_string)
            .or_else(|| c.first_str(&["heading", "page_title"]).and_then(derive_name));

        let specialty = ["specialty", "specialties", "expertise"]
            .iter()
            .map(|k| c.str_list(k))
            .find(|items| !items.is_empty())
            .unwrap_or_default();

        Self {
            name,
            title: c.first_str(&["title", "job_title", "role"]),
            organization: c.first_str(&["organization", "company"]),
            specialty,
            location: c.first_str(&["location", "city"]),
            source_url: c.first_str(&["source_url", "url", "profile_url"]),
        }
    }

    // Scrape pages use `title` for the HTML <title>, so the job title
    // lives under `job_title`.
    fn from_scrape(c: &'a RawCandidate) -> Self {
        let name = c
            .get_str("name")
            .map(str::to_string)
            .or_else(|| c.get_str("heading").and_then(derive_name))
            .or_else(|| c.get_str("title").and_then(derive_name));

        Self {
            name,
            title: c.get_str("job_title"),
            organization: c.first_str(&["organization", "site_name"]),
            specialty: c.str_list("specialty"),
            location: c.get_str("location"),
            source_url: c.get_str("source_url"),
        }
    }
}

/// Name part of a heading or page title: the text before the first
/// separator, whitespace-collapsed.
pub fn derive_name(heading: &str) -> Option<String> {
    let cut = TITLE_SEPARATORS
        .iter()
        .filter_map(|sep| heading.find(sep))
        .min()
        .unwrap_or(heading.len());
    clean_name(&heading[..cut])
}

fn clean_name(raw: &str) -> Option<String> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!name.is_empty()).then_some(name)
}

/// Split on `,` and `;`, trim, drop empties and case-insensitive repeats.
pub fn normalize_specialty<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    let mut out = Vec::new();
    for item in raw
        .into_iter()
        .flat_map(|s| s.split([',', ';']))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let folded = item.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            out.push(item.to_string());
        }
    }
    out
}

/// Turns raw candidates into scored, contact-enriched prospects.
#[derive(Debug, Clone, Default)]
pub struct ProspectNormalizer {
    extractor: ContactExtractor,
    scorer: FitScorer,
}

impl ProspectNormalizer {
    pub fn new(criteria: ScoringCriteria) -> Self {
        Self {
            extractor: ContactExtractor::new(),
            scorer: FitScorer::new(criteria),
        }
    }

    /// Normalize one candidate. `None` when it has no usable name or no
    /// source URL.
    pub fn normalize(&self, candidate: &RawCandidate) -> Option<Prospect> {
        let view = CandidateView::read(candidate);

        let Some(name) = view.name.as_deref().and_then(clean_name) else {
            debug!(source = %candidate.source(), "Dropping candidate without a name");
            return None;
        };
        let Some(source_url) = view.source_url else {
            debug!(name = %name, "Dropping candidate without a source URL");
            return None;
        };

        let raw_text = candidate.all_text().join("\n");
        let contact = self.extractor.extract(&raw_text, candidate);
        let specialty = normalize_specialty(view.specialty.iter().copied());

        let fit_score = self.scorer.score(&ScoreInput {
            has_name: true,
            specialty: &specialty,
            location: view.location,
            raw_text: &raw_text,
            contact: &contact,
        });

        Some(Prospect {
            name,
            title: view.title.map(str::to_string),
            organization: view.organization.map(str::to_string),
            specialty,
            location: view.location.map(str::to_string),
            source_url: source_url.to_string(),
            source: candidate.source(),
            contact,
            fit_score,
        })
    }

    /// Normalize a batch and dedupe it, preserving input order.
    ///
    /// Checks `cancel` between candidates.
    pub fn normalize_all(
        &self,
        candidates: &[RawCandidate],
        cancel: &CancellationToken,
    ) -> Result<Vec<Prospect>> {
        let mut prospects = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if cancel.is_cancelled() {
                return Err(DiscoveryError::Cancelled);
            }
            if let Some(prospect) = self.normalize(candidate) {
                prospects.push(prospect);
            }
        }
        Ok(dedupe_prospects(prospects))
    }
}

/// Collapse prospects that share a dedupe key.
///
/// The survivor is the one with more contact fields, then the higher fit
/// score; it takes the position of the first occurrence. Idempotent.
pub fn dedupe_prospects(prospects: Vec<Prospect>) -> Vec<Prospect> {
    let mut kept: Vec<Prospect> = Vec::with_capacity(prospects.len());
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for prospect in prospects {
        let key = prospect.dedupe_key();
        match index.get(&key) {
            Some(&slot) => {
                let replace = outranks(&prospect, &kept[slot]);
                debug!(
                    name = %prospect.name,
                    host = %key.1,
                    replaced = replace,
                    "Duplicate prospect collapsed"
                );
                if replace {
                    kept[slot] = prospect;
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(prospect);
            }
        }
    }

    kept
}

fn outranks(challenger: &Prospect, incumbent: &Prospect) -> bool {
    (challenger.contact.filled_count(), challenger.fit_score)
        > (incumbent.contact.filled_count(), incumbent.fit_score)
}
