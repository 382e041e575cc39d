// src/condense.rs
//! Fallback condenser for very long articles.
//!
//! Independent of the primary ranker: TextRank over a sentence graph whose edges are
//! content-word overlaps normalized by sentence length. The top sentences are returned
//! in original order as a single paragraph.
//!
//! The graph is stored as adjacency lists over non-zero edges and the input is capped at
//! [`MAX_GRAPH_SENTENCES`]; larger bodies are rejected rather than ranked.

use std::collections::HashSet;

use crate::error::CondenseError;
use crate::text::segment::split_sentences;
use crate::text::tokenize::{is_stopword, lowercase_words};

/// Damping factor for PageRank iteration.
const DAMPING: f64 = 0.85;
/// Convergence threshold.
const CONVERGENCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 100;

pub const DEFAULT_FALLBACK_SENTENCES: usize = 5;
/// Largest body, in sentences, the TextRank graph is built for.
pub const MAX_GRAPH_SENTENCES: usize = 600;

/// Supplementary digest producer. Failures are never fatal to the caller's summary.
pub trait Condenser: Send + Sync {
    fn condense(&self, text: &str, max_sentences: usize) -> Result<String, CondenseError>;

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextRankCondenser;

impl Condenser for TextRankCondenser {
    fn condense(&self, text: &str, max_sentences: usize) -> Result<String, CondenseError> {
        let sentences = split_sentences(text);
        if sentences.len() < 2 {
            return Err(CondenseError::TooFewSentences {
                needed: 2,
                found: sentences.len(),
            });
        }
        if sentences.len() <= max_sentences {
            return Ok(sentences.join(" "));
        }
        if sentences.len() > MAX_GRAPH_SENTENCES {
            return Err(CondenseError::TooManySentences {
                limit: MAX_GRAPH_SENTENCES,
                found: sentences.len(),
            });
        }

        let scores = rank_sentences(&sentences)?;
        let mut indexed: Vec<(usize, f64)> = scores.into_iter().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        // Take top N, then re-sort by original position for coherent output.
        let mut top: Vec<usize> = indexed
            .iter()
            .take(max_sentences)
            .map(|(i, _)| *i)
            .collect();
        top.sort_unstable();

        Ok(top
            .iter()
            .map(|&i| sentences[i].as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn name(&self) -> &'static str {
        "textrank"
    }
}

fn content_words(sentence: &str) -> HashSet<String> {
    lowercase_words(sentence)
        .into_iter()
        .filter(|w| !is_stopword(w))
        .collect()
}

/// Overlap similarity from the TextRank paper: `|Si ∩ Sj| / (ln|Si| + ln|Sj|)`.
fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let common = a.intersection(b).count();
    if common == 0 {
        return 0.0;
    }
    let denom = (a.len() as f64).ln() + (b.len() as f64).ln();
    if denom <= f64::EPSILON {
        // Two one-word sentences sharing that word.
        return 1.0;
    }
    common as f64 / denom
}

fn rank_sentences(sentences: &[String]) -> Result<Vec<f64>, CondenseError> {
    let n = sentences.len();
    let words: Vec<HashSet<String>> = sentences.iter().map(|s| content_words(s)).collect();

    // Undirected weighted edges, kept only where the overlap is non-zero.
    let mut edges: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            let w = overlap(&words[i], &words[j]);
            if w > 0.0 {
                edges[i].push((j, w));
                edges[j].push((i, w));
            }
        }
    }
    if edges.iter().all(Vec::is_empty) {
        return Err(CondenseError::EmptyGraph);
    }

    let out_sum: Vec<f64> = edges
        .iter()
        .map(|adj| adj.iter().map(|&(_, w)| w).sum())
        .collect();

    let mut scores = vec![1.0 / n as f64; n];
    for _ in 0..MAX_ITERATIONS {
        let mut max_diff = 0.0f64;
        let next: Vec<f64> = (0..n)
            .map(|i| {
                let acc: f64 = edges[i]
                    .iter()
                    .filter(|&&(j, _)| out_sum[j] > f64::EPSILON)
                    .map(|&(j, w)| w * scores[j] / out_sum[j])
                    .sum();
                let v = (1.0 - DAMPING) / n as f64 + DAMPING * acc;
                max_diff = max_diff.max((v - scores[i]).abs());
                v
            })
            .collect();

        scores = next;
        if max_diff < CONVERGENCE {
            break;
        }
    }
    Ok(scores)
}
