//! Fit scoring.
//!
//! Additive and deterministic. A named candidate starts at 50, then earns:
//!
//! | Signal                                        | Bonus |
//! |-----------------------------------------------|-------|
//! | a specialty contains the requested specialty  | +20   |
//! | the location contains the requested location  | +15   |
//! | every context term appears in the raw text    | +10   |
//! | at least one contact field was found          | +5    |
//!
//! URL-scrape calls have no criteria, so only the base and contact bonus
//! apply there.

use crate::types::prospect::ContactInfo;

const BASE_SCORE: u32 = 50;
const SPECIALTY_BONUS: u32 = 20;
const LOCATION_BONUS: u32 = 15;
const CONTEXT_BONUS: u32 = 10;
const CONTACT_BONUS: u32 = 5;
const MAX_SCORE: u32 = 100;

/// Context terms shorter than this are ignored ("in", "a", "of") unless
/// they look like an abbreviation or a number ("DC", "AP", "12").
const MIN_TERM_LEN: usize = 3;

/// What the caller asked for, lowercased once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoringCriteria {
    specialty: Option<String>,
    location: Option<String>,
    context_terms: Vec<String>,
}

impl ScoringCriteria {
    pub fn new(specialty: &str, location: &str, context: Option<&str>) -> Self {
        Self {
            specialty: lowered(specialty),
            location: lowered(location),
            context_terms: context.map(context_terms).unwrap_or_default(),
        }
    }

    /// No criteria at all (URL-scrape mode).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn context_terms(&self) -> &[String] {
        &self.context_terms
    }
}

fn lowered(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_lowercase())
}

/// Alphanumeric runs of the context, lowercased.
///
/// Runs of three or more characters are kept. Shorter runs are kept only
/// when written in capitals or containing a digit, so "in DC" keeps "dc"
/// and "K-12" keeps "12", while "in" and "a" are dropped.
pub fn context_terms(context: &str) -> Vec<String> {
    context
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| is_meaningful_term(term))
        .map(str::to_lowercase)
        .collect()
}

fn is_meaningful_term(term: &str) -> bool {
    let len = term.chars().count();
    if len >= MIN_TERM_LEN {
        return true;
    }
    len == 2
        && (term.chars().any(|c| c.is_ascii_digit())
            || term.chars().all(|c| c.is_uppercase()))
}

/// Whether `term` occurs in `text`. Short terms must be a whole word so
/// "dc" does not match inside "feedback".
fn mentions(text: &str, term: &str) -> bool {
    if term.chars().count() >= MIN_TERM_LEN {
        return text.contains(term);
    }
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| word == term)
}

/// The parts of a normalized candidate the scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub has_name: bool,
    pub specialty: &'a [String],
    pub location: Option<&'a str>,
    pub raw_text: &'a str,
    pub contact: &'a ContactInfo,
}

#[derive(Debug, Clone, Default)]
pub struct FitScorer {
    criteria: ScoringCriteria,
}

impl FitScorer {
    pub fn new(criteria: ScoringCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &ScoringCriteria {
        &self.criteria
    }

    /// Score in `0..=100`.
    pub fn score(&self, input: &ScoreInput<'_>) -> u8 {
        if !input.has_name {
            return 0;
        }

        let mut score = BASE_SCORE;

        if let Some(wanted) = &self.criteria.specialty {
            if input.specialty.iter().any(|s| contains_wanted(s, wanted)) {
                score += SPECIALTY_BONUS;
            }
        }

        if let (Some(wanted), Some(location)) = (&self.criteria.location, input.location) {
            if contains_wanted(location, wanted) {
                score += LOCATION_BONUS;
            }
        }

        if !self.criteria.context_terms.is_empty() {
            let text = input.raw_text.to_lowercase();
            if self
                .criteria
                .context_terms
                .iter()
                .all(|term| mentions(&text, term))
            {
                score += CONTEXT_BONUS;
            }
        }

        if !input.contact.is_empty() {
            score += CONTACT_BONUS;
        }

        score.min(MAX_SCORE) as u8
    }
}

/// Case-insensitive: the candidate's value contains what was asked for.
/// `wanted` is already lowercased and never blank.
fn contains_wanted(value: &str, wanted: &str) -> bool {
    value.to_lowercase().contains(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(
        specialty: &'a [String],
        location: Option<&'a str>,
        raw_text: &'a str,
        contact: &'a ContactInfo,
    ) -> ScoreInput<'a> {
        ScoreInput {
            has_name: true,
            specialty,
            location,
            raw_text,
            contact,
        }
    }

    fn criteria() -> ScoringCriteria {
        ScoringCriteria::new(
            "Educational Consultant",
            "Washington DC",
            Some("works with high school students"),
        )
    }

    #[test]
    fn test_context_terms() {
        assert_eq!(
            context_terms("works with high-school students, in DC"),
            vec!["works", "with", "high", "school", "students", "dc"]
        );
        assert_eq!(context_terms("AP prep for K-12"), vec!["ap", "prep", "for", "12"]);
        assert!(context_terms("a to be").is_empty());
        assert!(context_terms("  ").is_empty());
    }

    #[test]
    fn test_base_score_only() {
        let contact = ContactInfo::default();
        let scorer = FitScorer::new(ScoringCriteria::none());
        assert_eq!(scorer.score(&input(&[], None, "", &contact)), 50);
    }

    #[test]
    fn test_nameless_scores_zero() {
        let contact = ContactInfo::default();
        let scorer = FitScorer::new(criteria());
        let mut inp = input(&[], None, "", &contact);
        inp.has_name = false;
        assert_eq!(scorer.score(&inp), 0);
    }

    #[test]
    fn test_full_match_is_one_hundred() {
        let specialty = vec!["educational consultant".to_string()];
        let contact = ContactInfo {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        let scorer = FitScorer::new(criteria());
        let score = scorer.score(&input(
            &specialty,
            Some("Washington DC"),
            "Jane works with high school students on college essays",
            &contact,
        ));
        assert_eq!(score, 100);
    }

    #[test]
    fn test_candidate_value_must_contain_request() {
        let contact = ContactInfo::default();
        let scorer = FitScorer::new(ScoringCriteria::new("consultant", "Washington", None));
        let specialty = vec!["Independent Educational Consultant".to_string()];
        assert_eq!(
            scorer.score(&input(&specialty, Some("Washington DC"), "", &contact)),
            85
        );

        // A narrower candidate value is not a match
        let scorer = FitScorer::new(ScoringCriteria::new(
            "educational consultant",
            "Washington DC",
            None,
        ));
        let specialty = vec!["Consultant".to_string()];
        assert_eq!(scorer.score(&input(&specialty, Some("DC"), "", &contact)), 50);
    }

    #[test]
    fn test_short_candidate_values_do_not_match_longer_requests() {
        let contact = ContactInfo::default();

        let scorer = FitScorer::new(ScoringCriteria::new("tutor", "Chicago", None));
        assert_eq!(scorer.score(&input(&[], Some("CA"), "", &contact)), 50);

        let scorer = FitScorer::new(ScoringCriteria::new("chartered accountant", "Chicago", None));
        let specialty = vec!["art".to_string()];
        assert_eq!(scorer.score(&input(&specialty, None, "", &contact)), 50);
    }

    #[test]
    fn test_short_context_terms_match_whole_words() {
        let contact = ContactInfo::default();
        let scorer = FitScorer::new(ScoringCriteria::new("", "", Some("AP tutoring in DC")));

        assert_eq!(
            scorer.score(&input(&[], None, "AP and SAT tutoring around DC.", &contact)),
            60
        );
        // "ap" and "dc" inside other words do not count
        assert_eq!(
            scorer.score(&input(&[], None, "Happy tutoring feedback", &contact)),
            50
        );
    }

    #[test]
    fn test_partial_context_earns_nothing() {
        let contact = ContactInfo::default();
        let scorer = FitScorer::new(ScoringCriteria::new("", "", Some("high school students")));
        assert_eq!(scorer.score(&input(&[], None, "Works with students", &contact)), 50);
        assert_eq!(
            scorer.score(&input(&[], None, "HIGH SCHOOL STUDENTS welcome", &contact)),
            60
        );
    }

    #[test]
    fn test_blank_values_never_match() {
        let contact = ContactInfo::default();
        let scorer = FitScorer::new(ScoringCriteria::new("  ", "", Some("")));
        let specialty = vec!["tutor".to_string()];
        assert_eq!(scorer.score(&input(&specialty, Some("DC"), "anything", &contact)), 50);

        let scorer = FitScorer::new(criteria());
        let blank = vec!["  ".to_string()];
        assert_eq!(scorer.score(&input(&blank, Some(""), "", &contact)), 50);
    }

    #[test]
    fn test_contact_bonus() {
        let contact = ContactInfo {
            phone: Some("202-555-0143".to_string()),
            ..Default::default()
        };
        let scorer = FitScorer::new(ScoringCriteria::none());
        assert_eq!(scorer.score(&input(&[], None, "", &contact)), 55);
    }
}
