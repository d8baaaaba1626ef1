//! # Normalization
//!
//! Canonical forms used for uniqueness checks and ordering. All functions
//! are pure and idempotent: `f(f(x)) == f(x)`.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Basic `local@domain.tld` shape.
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex");
}

/// Remove accents by decomposing (NFD) and dropping combining marks.
pub fn strip_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Legal ID key: uppercase, diacritics stripped, Unicode alphanumerics only.
///
/// `"123-45-678"` and `"123 45 678"` both become `"12345678"`. Letters and
/// digits outside ASCII are kept, so a non-Latin ID never collapses to `""`.
pub fn normalize_legal_id(value: &str) -> String {
    let upper = value.to_uppercase();
    strip_diacritics(&upper)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Name key: uppercase, diacritics stripped, inner whitespace collapsed.
pub fn normalize_name(value: &str) -> String {
    let upper = value.to_uppercase();
    strip_diacritics(&upper)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Phone digits with every non-digit removed.
pub fn phone_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trimmed, lowercased email.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Trim an optional free-text field; blank becomes `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
