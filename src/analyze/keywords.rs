// src/analyze/keywords.rs
//! Keyword extraction: lower-cased content words ranked by frequency, ties broken by
//! first occurrence. Stopwords, digit-bearing tokens and one-letter tokens are dropped.

use std::collections::HashMap;

use crate::text::tokenize::{is_numeric, is_stopword, lowercase_words};

pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    // word -> (count, first position)
    let mut stats: HashMap<String, (usize, usize)> = HashMap::new();

    for (pos, word) in lowercase_words(text).into_iter().enumerate() {
        let word = match word.strip_suffix("'s") {
            Some(stem) => stem.to_string(),
            None => word,
        };
        if word.chars().count() < 2 || is_numeric(&word) || is_stopword(&word) {
            continue;
        }
        stats.entry(word).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = stats
        .into_iter()
        .map(|(w, (count, first))| (w, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked.into_iter().take(limit).map(|(w, _, _)| w).collect()
}
