// src/analyze/mod.rs
//! Lexical feature extraction: keywords, entities, dates and figures.
//!
//! `FeatureExtractor` is the seam: `RuleBasedExtractor` is the regex/lexicon
//! implementation used by default; a statistical tagger can be swapped in as long as it
//! is deterministic for a fixed input.

pub mod keywords;
pub mod ner;
pub mod patterns;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SummarizeError;

pub use keywords::{extract_keywords, DEFAULT_KEYWORD_LIMIT};
pub use ner::{recognize, Entities};

/// Everything extracted from one article body.
///
/// Lists are deduplicated. `dates` and `numbers` keep source order, `keywords` keep
/// rank order (highest first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBag {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub places: Vec<String>,
    pub dates: Vec<String>,
    pub numbers: Vec<String>,
    pub keywords: Vec<String>,
}

impl FeatureBag {
    /// Every distinct phrase across all categories, lower-cased, first-seen order.
    /// This is what sentence ranking matches against.
    pub fn key_phrases(&self) -> Vec<String> {
        let all = self
            .people
            .iter()
            .chain(&self.organizations)
            .chain(&self.places)
            .chain(&self.dates)
            .chain(&self.numbers)
            .chain(&self.keywords)
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());
        dedup_in_order(all)
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
            && self.organizations.is_empty()
            && self.places.is_empty()
            && self.dates.is_empty()
            && self.numbers.is_empty()
            && self.keywords.is_empty()
    }

    /// Drop empty strings and duplicates that a third-party extractor might produce.
    pub fn normalized(self) -> Self {
        fn clean(v: Vec<String>) -> Vec<String> {
            dedup_in_order(v.into_iter().filter(|s| !s.trim().is_empty()))
        }
        Self {
            people: clean(self.people),
            organizations: clean(self.organizations),
            places: clean(self.places),
            dates: clean(self.dates),
            numbers: clean(self.numbers),
            keywords: clean(self.keywords),
        }
    }
}

/// Capability: text in, `FeatureBag` out. Implementations must be pure and safe to
/// share across threads.
pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<FeatureBag, SummarizeError>;

    /// Name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Regex + lexicon extractor.
#[derive(Debug, Clone)]
pub struct RuleBasedExtractor {
    keyword_limit: usize,
}

impl RuleBasedExtractor {
    pub fn new(keyword_limit: usize) -> Self {
        Self { keyword_limit }
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_LIMIT)
    }
}

impl FeatureExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> Result<FeatureBag, SummarizeError> {
        let Entities {
            people,
            places,
            organizations,
        } = recognize(text);

        Ok(FeatureBag {
            people,
            organizations,
            places,
            dates: patterns::extract_dates(text),
            numbers: patterns::extract_numbers(text),
            keywords: extract_keywords(text, self.keyword_limit),
        })
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}

/// Keep the first occurrence of each item.
pub(crate) fn dedup_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
