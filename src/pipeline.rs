// src/pipeline.rs
//! Summarization entry point.
//!
//! raw body → sentences → feature bag → per-sentence scores → selection/assembly,
//! with the fallback condenser run on the same body for very long articles and its
//! digest appended as a final section.

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyze::{FeatureBag, FeatureExtractor, RuleBasedExtractor};
use crate::assemble::Assembly;
use crate::condense::{Condenser, TextRankCondenser};
use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::metrics::{FALLBACK_FAILURES_TOTAL, FALLBACK_SKIPPED_TOTAL};
use crate::rank::{RankContext, SentenceRanker, SignalBreakdown};
use crate::telemetry::{anon_hash, dev_logging_enabled, truncate_vec};
use crate::text::split_sentences;

/// Article metadata. The body travels separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default, alias = "sourceName")]
    pub source: String,
}

impl Article {
    pub fn new(title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    pub content: String,
    #[serde(rename = "keyPhrases")]
    pub key_phrases: FeatureBag,
}

/// Per-sentence score with its uncapped signal contributions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceReport {
    pub index: usize,
    pub sentence: String,
    pub score: f64,
    pub signals: SignalBreakdown,
}

/// Holds no per-article state; one instance can serve concurrent calls.
pub struct Summarizer {
    config: SummarizerConfig,
    ranker: SentenceRanker,
    extractor: Box<dyn FeatureExtractor>,
    condenser: Box<dyn Condenser>,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(SummarizerConfig::default())
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("profile", &self.ranker.profile().name)
            .field("extractor", &self.extractor.name())
            .field("condenser", &self.condenser.name())
            .finish()
    }
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        let ranker = SentenceRanker::new(config.ranking.resolve());
        let extractor = Box::new(RuleBasedExtractor::new(config.features.keyword_limit));
        Self {
            config,
            ranker,
            extractor,
            condenser: Box::new(TextRankCondenser),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn FeatureExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_condenser(mut self, condenser: Box<dyn Condenser>) -> Self {
        self.condenser = condenser;
        self
    }

    pub fn with_ranker(mut self, ranker: SentenceRanker) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn summarize(&self, article: &Article, body: &str) -> Result<SummaryResult, SummarizeError> {
        if body.trim().is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        let sentences = split_sentences(body);
        let features = self.extractor.extract(body)?.normalized();
        let ctx = RankContext::new(&sentences, &article.title, &features);
        let scored = self.ranker.rank_all(&ctx)?;

        let assembly = Assembly::build(
            &scored,
            &features,
            &self.config.selection,
            &self.config.features,
        );
        let digest = self.fallback_digest(article, body, sentences.len());
        let content = assembly.content(digest.as_deref());

        debug!(
            target: "summarizer",
            sentences = sentences.len(),
            selected = assembly.selected.len(),
            paragraphs = assembly.paragraphs.len(),
            fallback = digest.is_some(),
            profile = %self.ranker.profile().name,
            "summary assembled"
        );
        if dev_logging_enabled() {
            let picked: Vec<usize> = assembly.selected.iter().map(|s| s.index).collect();
            info!(
                target: "summarizer",
                id = %anon_hash(&article.title),
                picked = ?truncate_vec(&picked, 20),
                keywords = ?truncate_vec(&features.keywords, 5),
                "dev summary"
            );
        }

        Ok(SummaryResult {
            title: article.title.clone(),
            content,
            key_phrases: features,
        })
    }

    /// Score every sentence without selecting, for tuning weight tables.
    pub fn score(&self, title: &str, body: &str) -> Result<Vec<SentenceReport>, SummarizeError> {
        if body.trim().is_empty() {
            return Err(SummarizeError::EmptyInput);
        }
        let sentences = split_sentences(body);
        let features = self.extractor.extract(body)?.normalized();
        let ctx = RankContext::new(&sentences, title, &features);

        Ok(self
            .ranker
            .rank_all(&ctx)?
            .into_iter()
            .map(|s| SentenceReport {
                signals: self.ranker.breakdown(&ctx, s.index),
                index: s.index,
                sentence: s.sentence,
                score: s.score,
            })
            .collect())
    }

    // Failures are logged and dropped: the digest is optional.
    fn fallback_digest(&self, article: &Article, body: &str, sentence_count: usize) -> Option<String> {
        let fb = &self.config.fallback;
        if !fb.enabled || body.chars().count() <= fb.min_chars {
            return None;
        }
        if sentence_count > fb.max_input_sentences {
            counter!(FALLBACK_SKIPPED_TOTAL).increment(1);
            warn!(
                target: "summarizer",
                id = %anon_hash(&article.title),
                sentences = sentence_count,
                limit = fb.max_input_sentences,
                "body too long for the fallback condenser, omitting digest"
            );
            return None;
        }
        match self.condenser.condense(body, fb.sentences) {
            Ok(digest) if !digest.trim().is_empty() => Some(digest),
            Ok(_) => None,
            Err(e) => {
                counter!(FALLBACK_FAILURES_TOTAL).increment(1);
                warn!(
                    target: "summarizer",
                    id = %anon_hash(&article.title),
                    condenser = self.condenser.name(),
                    error = %e,
                    "fallback condenser failed, omitting digest"
                );
                None
            }
        }
    }
}

/// Summarize with the default configuration.
pub fn summarize(article: &Article, body: &str) -> Result<SummaryResult, SummarizeError> {
    Summarizer::default().summarize(article, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::SENTINEL;
    use crate::error::CondenseError;

    struct Failing;
    impl Condenser for Failing {
        fn condense(&self, _: &str, _: usize) -> Result<String, CondenseError> {
            Err(CondenseError::EmptyGraph)
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct Broken;
    impl FeatureExtractor for Broken {
        fn extract(&self, _: &str) -> Result<FeatureBag, SummarizeError> {
            Err(SummarizeError::Extraction("tagger offline".into()))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn whitespace_body_is_empty_input() {
        let a = Article::new("T", "S");
        assert_eq!(summarize(&a, " \n\t ").unwrap_err(), SummarizeError::EmptyInput);
    }

    #[test]
    fn short_article_keeps_every_sentence() {
        let body = "The Reserve Bank of India raised rates by 25 basis points. \
                    Governor Shaktikanta Das said inflation remains high. \
                    Markets in Mumbai fell 2% after the announcement.";
        let out = summarize(&Article::new("RBI raises rates", "Mint"), body).unwrap();
        assert_eq!(out.title, "RBI raises rates");
        for s in split_sentences(body) {
            assert!(out.content.contains(&s), "missing: {s}");
        }
        assert_ne!(out.content, SENTINEL);
    }

    #[test]
    fn extractor_failure_propagates() {
        let s = Summarizer::default().with_extractor(Box::new(Broken));
        let err = s.summarize(&Article::default(), "One. Two.").unwrap_err();
        assert!(matches!(err, SummarizeError::Extraction(_)));
    }

    #[test]
    fn condenser_failure_is_swallowed() {
        let mut cfg = SummarizerConfig::default();
        cfg.fallback.min_chars = 10;
        let s = Summarizer::new(cfg).with_condenser(Box::new(Failing));
        let out = s
            .summarize(&Article::default(), "Floods hit the city. Schools were shut.")
            .unwrap();
        assert!(out.content.contains("Floods hit the city."));
    }

    struct Unreachable;
    impl Condenser for Unreachable {
        fn condense(&self, _: &str, _: usize) -> Result<String, CondenseError> {
            panic!("condenser must not run above the sentence limit")
        }
        fn name(&self) -> &'static str {
            "unreachable"
        }
    }

    #[test]
    fn fallback_is_skipped_above_sentence_limit() {
        let mut cfg = SummarizerConfig::default();
        cfg.fallback.min_chars = 10;
        cfg.fallback.max_input_sentences = 2;
        let s = Summarizer::new(cfg).with_condenser(Box::new(Unreachable));
        let out = s
            .summarize(&Article::default(), "Floods hit the city. Schools were shut. Trains stopped.")
            .unwrap();
        assert!(out.content.contains("Trains stopped."));
    }

    #[test]
    fn score_reports_every_sentence() {
        let body = "First line here. Second line here. Third line here.";
        let r = Summarizer::default().score("Line", body).unwrap();
        assert_eq!(r.len(), 3);
        assert!(r.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn result_serializes_with_camel_case_key() {
        let out = summarize(&Article::new("T", "S"), "Alpha beta gamma.").unwrap();
        let v = serde_json::to_value(&out).unwrap();
        assert!(v.get("keyPhrases").is_some());
        assert!(v["keyPhrases"].get("keywords").is_some());
    }
}
