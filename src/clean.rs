// src/clean.rs
//! Upstream text cleaning for scraped article bodies and feed descriptions.
//!
//! The summarizer expects plain text. These helpers are what the service applies when a
//! caller sends markup or scraped page text (`"clean": true`).

use once_cell::sync::Lazy;
use regex::Regex;

static RE_BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static RE_BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|div|h[1-6]|li|blockquote)\s*>").unwrap());
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
static RE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Advertisement|Follow us|Share this|Subscribe|Newsletter)\b.*?[.!?]")
        .unwrap()
});
static RE_METADATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:Written by|Last Updated:|Updated:|Published:).*?[.!?]").unwrap());
static RE_AGENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*(?:PTI|ANI)\s*\)").unwrap());
static RE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*\([^)]*\)[ \t]*").unwrap());
static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+([.,;:!?])").unwrap());
static RE_PARA_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*\n\s*").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Clean a scraped article body. Paragraph breaks (blank lines) survive; every other
/// whitespace run collapses to one space.
pub fn clean_article_text(raw: &str) -> String {
    // 1) Markup to plain text
    let out = RE_BR.replace_all(raw, "\n");
    let out = RE_BLOCK_END.replace_all(&out, "\n\n");
    let out = RE_TAGS.replace_all(&out, "");
    let out = decode_entities(&out);

    // 2) Page furniture
    let out = RE_BOILERPLATE.replace_all(&out, "");
    let out = RE_METADATA.replace_all(&out, "");
    let out = RE_AGENCY.replace_all(&out, "");

    // 3) Asides
    let out = RE_PAREN.replace_all(&out, " ");
    let out = RE_SPACE_BEFORE_PUNCT.replace_all(&out, "$1");

    // 4) Whitespace, paragraph by paragraph
    RE_PARA_BREAK
        .split(&out)
        .map(|p| RE_WS.replace_all(p, " ").trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Feed descriptions: markup stripped, entities decoded, whitespace collapsed.
pub fn clean_description(raw: &str) -> String {
    let out = RE_BR.replace_all(raw, "\n");
    let out = RE_TAGS.replace_all(&out, "");
    let out = decode_entities(&out);
    RE_WS.replace_all(&out, " ").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).replace('\u{a0}', " ")
}
