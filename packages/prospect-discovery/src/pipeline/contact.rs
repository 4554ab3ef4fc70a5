//! Best-effort contact extraction.
//!
//! Email, phone and website are looked up independently. Explicitly
//! labelled fields win, then any other field value, then the raw text.
//! Extraction never fails; it only finds less.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::candidate::RawCandidate;
use crate::types::prospect::ContactInfo;

const EMAIL_KEYS: &[&str] = &["email", "email_address", "contact_email"];
const PHONE_KEYS: &[&str] = &["phone", "phone_number", "telephone", "tel", "contact_phone"];
const WEBSITE_KEYS: &[&str] = &["website", "homepage", "home_page", "website_url", "site_url"];

/// Nested object some AI providers use for contact details.
const CONTACT_OBJECT: &str = "contact";

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)+").unwrap();

    // Optional +country, optional (area), then 2-5 digit groups with
    // optional `-`, `.` or space separators
    static ref PHONE: Regex = Regex::new(
        r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{1,4}\)[\s.\-]?)?\d{2,4}(?:[\s.\-]?\d{2,4}){1,4}"
    )
    .unwrap();

    static ref ISO_DATE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref YEAR_RANGE: Regex = Regex::new(r"^(?:19|20)\d{2}-(?:19|20)\d{2}$").unwrap();
    static ref DOTTED_QUAD: Regex = Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}$").unwrap();
}

/// Pulls email, phone and website out of a raw candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactExtractor;

impl ContactExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract whatever contact details can be found.
    ///
    /// `raw_text` is the candidate's body text; `raw_fields` is searched
    /// first. The page a candidate was found on is never used as its
    /// website.
    pub fn extract(&self, raw_text: &str, raw_fields: &RawCandidate) -> ContactInfo {
        let everything = raw_fields.all_text();

        let email = labelled(raw_fields, EMAIL_KEYS, "email")
            .into_iter()
            .chain(everything.iter().copied())
            .chain(std::iter::once(raw_text))
            .find_map(find_email);

        let phone = labelled(raw_fields, PHONE_KEYS, "phone")
            .into_iter()
            .chain(everything.iter().copied())
            .chain(std::iter::once(raw_text))
            .find_map(find_phone);

        // Verbatim, and only from explicitly labelled fields
        let website = labelled(raw_fields, WEBSITE_KEYS, "website")
            .into_iter()
            .next()
            .map(str::to_string);

        ContactInfo {
            email,
            phone,
            website,
        }
    }
}

/// Values of explicitly labelled fields, top-level keys first.
fn labelled<'a>(fields: &'a RawCandidate, keys: &[&str], nested_key: &str) -> Vec<&'a str> {
    keys.iter()
        .filter_map(|k| fields.get_str(k))
        .chain(fields.nested_str(CONTACT_OBJECT, nested_key))
        .collect()
}

/// First syntactically valid `local@domain` token in `text`.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|candidate| is_valid_email(candidate))
        .map(str::to_string)
}

/// Non-empty local part, a single `@`, and a dotted domain without empty labels.
pub fn is_valid_email(token: &str) -> bool {
    let mut parts = token.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// First loose phone-number token in `text` with 7 to 15 digits.
pub fn find_phone(text: &str) -> Option<String> {
    PHONE
        .find_iter(text)
        .filter(|m| standalone(text, m.start(), m.end()))
        .map(|m| m.as_str().trim())
        .find(|candidate| is_plausible_phone(candidate))
        .map(str::to_string)
}

fn is_plausible_phone(token: &str) -> bool {
    let digits = token.chars().filter(char::is_ascii_digit).count();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        && !ISO_DATE.is_match(token)
        && !YEAR_RANGE.is_match(token)
        && !DOTTED_QUAD.is_match(token)
}

/// The match is not glued to surrounding words, paths or longer numbers.
fn standalone(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let glued_before = before.is_some_and(|c| c.is_alphanumeric() || matches!(c, '/' | '@' | '_'));
    let glued_after = after.is_some_and(|c| c.is_alphanumeric() || c == '_');
    !glued_before && !glued_after
}
