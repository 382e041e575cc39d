// src/text/tokenize.rs
//! Word tokenizer and stopword lexicon shared by the extractor, the similarity scorer and
//! the rankers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

// \w covers letters, digits and `_`; (?u) enables Unicode. Inner apostrophes stay
// attached so "don't" is one token.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?u)\b\w+(?:['’]\w+)*\b").expect("word regex"));

static STOPWORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    let raw = include_str!("../../data/stopwords_en.json");
    serde_json::from_str::<Vec<String>>(raw)
        .expect("valid stopword list")
        .into_iter()
        .collect()
});

/// A single word token with byte span and sequential index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub index: usize,
}

/// Basic, Unicode-friendly tokenizer.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    WORD_RE
        .find_iter(input)
        .enumerate()
        .map(|(i, m)| Token {
            text: m.as_str(),
            start: m.start(),
            end: m.end(),
            index: i,
        })
        .collect()
}

/// Lower-cased word tokens in source order (duplicates kept).
pub fn lowercase_words(input: &str) -> Vec<String> {
    WORD_RE
        .find_iter(input)
        .map(|m| normalize_word(m.as_str()))
        .collect()
}

/// Lower-case and fold typographic apostrophes so lexicon lookups line up.
pub fn normalize_word(word: &str) -> String {
    word.to_lowercase().replace('’', "'")
}

/// Whitespace-delimited word count, the unit the length signals are defined in.
pub fn word_count(sentence: &str) -> usize {
    sentence.split_whitespace().count()
}

/// `word` must already be normalized (see [`normalize_word`]).
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

pub fn is_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
}
