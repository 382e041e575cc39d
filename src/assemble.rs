// src/assemble.rs
//! Selection and assembly: pick the top sentences, restore body order, group them into
//! paragraphs, and compose the final text behind a short generated introduction.

use crate::analyze::FeatureBag;
use crate::config::{FeatureConfig, SelectionConfig};
use crate::rank::ScoredSentence;
use crate::similarity::similarity;

/// Returned as `content` when no sentence survives selection.
pub const SENTINEL: &str = "Unable to generate summary. Please read the original article.";

/// Top `target` sentences by score (ties: earlier sentence first), in body order.
pub fn select_sentences(scored: &[ScoredSentence], target: usize) -> Vec<ScoredSentence> {
    let mut ranked: Vec<&ScoredSentence> = scored.iter().collect();
    // Stable: equal scores keep their original relative order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut picked: Vec<ScoredSentence> = ranked.into_iter().take(target).cloned().collect();
    picked.sort_by_key(|s| s.index);
    picked
}

/// Group consecutive sentences. A paragraph closes when it is full, at the last
/// sentence, or when the next sentence shifts topic (similarity below `threshold`).
pub fn group_paragraphs(sentences: &[&str], max_per_paragraph: usize, threshold: f64) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (i, &sentence) in sentences.iter().enumerate() {
        current.push(sentence);

        let full = current.len() >= max_per_paragraph;
        let topic_shift = sentences
            .get(i + 1)
            .map_or(true, |&next| similarity(sentence, next) < threshold);

        if full || topic_shift {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    }
    paragraphs
}

/// "This article discusses A, B, C. Key figures mentioned include X and Y."
/// `None` when there are neither entities nor figures to mention.
pub fn introduction(features: &FeatureBag, cfg: &FeatureConfig) -> Option<String> {
    let entities: Vec<&str> = features
        .people
        .iter()
        .take(cfg.intro_people)
        .chain(features.organizations.iter().take(cfg.intro_organizations))
        .chain(features.places.iter().take(cfg.intro_places))
        .map(String::as_str)
        .filter(|e| !e.is_empty())
        .collect();

    let mut parts = Vec::new();
    if !entities.is_empty() {
        parts.push(format!("This article discusses {}.", entities.join(", ")));
    }

    let figures: Vec<&str> = features
        .numbers
        .iter()
        .take(cfg.intro_numbers)
        .map(String::as_str)
        .collect();
    if !figures.is_empty() {
        parts.push(format!(
            "Key figures mentioned include {}.",
            figures.join(" and ")
        ));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Join the non-empty sections with blank lines, or return [`SENTINEL`].
pub fn compose(introduction: Option<&str>, paragraphs: &[String], fallback: Option<&str>) -> String {
    let sections: Vec<&str> = introduction
        .into_iter()
        .chain(paragraphs.iter().map(String::as_str))
        .chain(fallback)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sections.is_empty() {
        SENTINEL.to_string()
    } else {
        sections.join("\n\n")
    }
}

/// Primary summary before the optional fallback section is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub selected: Vec<ScoredSentence>,
    pub introduction: Option<String>,
    pub paragraphs: Vec<String>,
}

impl Assembly {
    pub fn build(
        scored: &[ScoredSentence],
        features: &FeatureBag,
        selection: &SelectionConfig,
        feature_cfg: &FeatureConfig,
    ) -> Self {
        let target = selection.target_count(scored.len());
        let selected = select_sentences(scored, target);
        let texts: Vec<&str> = selected.iter().map(|s| s.sentence.as_str()).collect();
        let paragraphs = group_paragraphs(
            &texts,
            selection.max_paragraph_sentences,
            selection.topic_shift_threshold,
        );

        Self {
            selected,
            // Nothing to introduce if nothing was selected.
            introduction: if paragraphs.is_empty() {
                None
            } else {
                introduction(features, feature_cfg)
            },
            paragraphs,
        }
    }

    pub fn content(&self, fallback: Option<&str>) -> String {
        compose(self.introduction.as_deref(), &self.paragraphs, fallback)
    }
}
