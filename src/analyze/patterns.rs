// src/analyze/patterns.rs
//! Regex patterns for dates, figures, quotations and the legacy entity cues.
//!
//! All patterns are compile-time constants; they live in `Lazy` statics and are never
//! mutated, so sharing them across concurrent summarizations is fine.

use once_cell::sync::Lazy;
use regex::Regex;

use super::dedup_in_order;

const MONTHS: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

/// `12/03/2024`, `1-2-24`, `3rd March 2024`, `March 3, 2024`.
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?i)\b(?:\d{{1,2}}[-/]\d{{1,2}}[-/]\d{{2,4}}|\d{{1,2}}(?:st|nd|rd|th)?\s+{m}\.?,?\s+\d{{2,4}}|{m}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}})\b",
        m = MONTHS
    );
    Regex::new(&pattern).expect("date regex")
});

/// Currency amounts (optionally with a magnitude), percentages, and bare numbers that
/// carry a magnitude word. Plain integers such as years are not figures.
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:[$₹€£]|\bRs\.?)\s?\d+(?:,\d{2,3})*(?:\.\d+)?(?:\s*(?:million|billion|trillion|crore|lakh))?\b|\b\d+(?:\.\d+)?\s?(?:%|per\s?cent\b)|\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:million|billion|trillion|crore|lakh)\b",
    )
    .expect("number regex")
});

static QUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'|“[^”]*”|‘[^’]*’"#).expect("quote regex"));

static NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%|\d+(?:,\d{3})*(?:\.\d+)?").expect("numeric regex"));

/// Cheap entity cues used by the legacy ranking profile. Each pattern counts once.
static LEGACY_ENTITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"[A-Z][a-z]+ (?:[A-Z][a-z]+ )*[A-Z][a-z]+",
        r"(?:Mr|Mrs|Ms|Dr)\. [A-Z][a-z]+",
        r"\d+(?:\.\d+)?%",
        r"(?:₹|\$|€|£)\s*\d+(?:,\d+)*(?:\.\d+)?",
        r"\d{1,2}(?:st|nd|rd|th)? [A-Z][a-z]+ \d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("legacy entity regex"))
    .collect()
});

/// Dates in source order, deduplicated.
pub fn extract_dates(text: &str) -> Vec<String> {
    dedup_in_order(DATE_RE.find_iter(text).map(|m| m.as_str().to_string()))
}

/// Percentages, currency amounts and magnitudes in source order, deduplicated.
pub fn extract_numbers(text: &str) -> Vec<String> {
    dedup_in_order(NUMBER_RE.find_iter(text).map(|m| m.as_str().trim().to_string()))
}

/// Double-, single- or typographically-quoted span anywhere in the sentence.
pub fn has_quotation(sentence: &str) -> bool {
    QUOTE_RE.is_match(sentence)
}

/// Percentage or (optionally comma-grouped) number anywhere in the sentence.
pub fn has_numeric(sentence: &str) -> bool {
    NUMERIC_RE.is_match(sentence)
}

/// Number of distinct legacy entity cues the sentence matches (0..=5).
pub fn legacy_entity_hits(sentence: &str) -> usize {
    LEGACY_ENTITY_PATTERNS
        .iter()
        .filter(|re| re.is_match(sentence))
        .count()
}
