// src/similarity.rs
//! Jaccard similarity over lower-cased word-token sets.
//!
//! Used for title relevance while ranking and for topic-shift detection while grouping
//! selected sentences into paragraphs.

use std::collections::HashSet;

use crate::text::tokenize::lowercase_words;

/// Lower-cased word tokens of `text`. Spans with no word characters at all (e.g. "!!!")
/// fall back to their whitespace-separated chunks so they are still self-similar.
pub fn token_set(text: &str) -> HashSet<String> {
    let words: HashSet<String> = lowercase_words(text).into_iter().collect();
    if !words.is_empty() {
        return words;
    }
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// `|A ∩ B| / |A ∪ B|` in `[0, 1]`. Two empty token sets score `0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}
