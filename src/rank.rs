// src/rank.rs
//! Sentence importance ranking.
//!
//! One ranker, driven by a `RankerProfile` (a table of signal rules and weights).
//! Each signal is scored independently and the total is capped:
//!
//! | signal       | `advanced` (cap 10)                | `legacy` (cap 13)                       |
//! |--------------|------------------------------------|-----------------------------------------|
//! | position     | first 2, first 20% 1.5, first 50% 1 | linear 3→1 over first 30%, tail 20% +1  |
//! | length       | 10..=30 words: 1                   | 10..=25: 2, 26..=40: 1                  |
//! | title        | 2 × Jaccard(sentence, title)       | 3 × covered title words, max 3          |
//! | key phrases  | 0.5 per feature phrase contained   | -                                       |
//! | cue phrases  | -                                  | 1 per cue ("according to", ...), max 3  |
//! | entity cues  | -                                  | 1 per entity pattern, max 2             |
//! | quotation    | 1                                  | 2                                       |
//! | numeric      | 1                                  | -                                       |
//!
//! Scores are pure functions of (sentence list, index, title, features, profile).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::analyze::{patterns, FeatureBag};
use crate::error::SummarizeError;
use crate::similarity::{jaccard, token_set};
use crate::text::tokenize::word_count;

pub const ADVANCED_CAP: f64 = 10.0;
pub const LEGACY_CAP: f64 = 13.0;

const LEGACY_CUE_PHRASES: &[&str] = &[
    "according to",
    "research shows",
    "study finds",
    "experts say",
    "reports indicate",
    "analysis shows",
    "data suggests",
    "evidence indicates",
    "results show",
    "findings reveal",
    "concluded that",
    "demonstrates that",
    "highlights that",
    "confirms that",
    "suggests that",
    "indicates that",
    "reveals that",
];

/* ----------------------------
Profile schema (TOML/JSON)
---------------------------- */

/// Built-in profile names selectable from config or per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileName {
    #[default]
    Advanced,
    Legacy,
}

impl ProfileName {
    pub fn profile(self) -> RankerProfile {
        match self {
            ProfileName::Advanced => RankerProfile::advanced(),
            ProfileName::Legacy => RankerProfile::legacy(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PositionRule {
    /// `first` for index 0, `head` inside the first `head_fraction`, `body` inside the
    /// first `body_fraction`, else 0.
    Banded {
        first: f64,
        head_fraction: f64,
        head: f64,
        body_fraction: f64,
        body: f64,
    },
    /// Inside the first `window_fraction`: `max - spread * (index / window)`.
    /// Past `tail_fraction`: `tail`.
    Decay {
        window_fraction: f64,
        max: f64,
        spread: f64,
        tail_fraction: f64,
        tail: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthBand {
    pub min_words: usize,
    pub max_words: usize,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum TitleRule {
    /// `weight × Jaccard(sentence, title)`.
    Jaccard { weight: f64 },
    /// `max × |title words in sentence| / |title words|`.
    Coverage { max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueRule {
    pub phrases: Vec<String>,
    pub per_hit: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCueRule {
    pub per_hit: f64,
    pub max: f64,
}

/// Signal weight table for the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerProfile {
    pub name: String,
    pub cap: f64,
    pub position: PositionRule,
    /// First matching band wins.
    #[serde(default)]
    pub length: Vec<LengthBand>,
    pub title: TitleRule,
    /// Points per distinct feature phrase contained in the sentence.
    #[serde(default)]
    pub key_phrase: f64,
    #[serde(default)]
    pub cue_phrases: Option<CueRule>,
    #[serde(default)]
    pub entity_cues: Option<EntityCueRule>,
    #[serde(default)]
    pub quotation: f64,
    #[serde(default)]
    pub numeric: f64,
}

impl RankerProfile {
    pub fn advanced() -> Self {
        Self {
            name: "advanced".into(),
            cap: ADVANCED_CAP,
            position: PositionRule::Banded {
                first: 2.0,
                head_fraction: 0.2,
                head: 1.5,
                body_fraction: 0.5,
                body: 1.0,
            },
            length: vec![LengthBand {
                min_words: 10,
                max_words: 30,
                points: 1.0,
            }],
            title: TitleRule::Jaccard { weight: 2.0 },
            key_phrase: 0.5,
            cue_phrases: None,
            entity_cues: None,
            quotation: 1.0,
            numeric: 1.0,
        }
    }

    pub fn legacy() -> Self {
        Self {
            name: "legacy".into(),
            cap: LEGACY_CAP,
            position: PositionRule::Decay {
                window_fraction: 0.3,
                max: 3.0,
                spread: 2.0,
                tail_fraction: 0.8,
                tail: 1.0,
            },
            length: vec![
                LengthBand {
                    min_words: 10,
                    max_words: 25,
                    points: 2.0,
                },
                LengthBand {
                    min_words: 26,
                    max_words: 40,
                    points: 1.0,
                },
            ],
            title: TitleRule::Coverage { max: 3.0 },
            key_phrase: 0.0,
            cue_phrases: Some(CueRule {
                phrases: LEGACY_CUE_PHRASES.iter().map(|s| s.to_string()).collect(),
                per_hit: 1.0,
                max: 3.0,
            }),
            entity_cues: Some(EntityCueRule {
                per_hit: 1.0,
                max: 2.0,
            }),
            quotation: 2.0,
            numeric: 0.0,
        }
    }

    /// Reject tables that could produce non-finite or negative scores.
    pub fn validate(&self) -> Result<(), String> {
        let finite_non_negative = |label: &str, v: f64| {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(format!("profile `{}`: {label} must be finite and >= 0", self.name))
            }
        };

        if !(self.cap.is_finite() && self.cap > 0.0) {
            return Err(format!("profile `{}`: cap must be finite and > 0", self.name));
        }
        match &self.position {
            PositionRule::Banded {
                first,
                head_fraction,
                head,
                body_fraction,
                body,
            } => {
                for (label, v) in [
                    ("position.first", *first),
                    ("position.head", *head),
                    ("position.body", *body),
                ] {
                    finite_non_negative(label, v)?;
                }
                fraction(&self.name, "position.head_fraction", *head_fraction)?;
                fraction(&self.name, "position.body_fraction", *body_fraction)?;
            }
            PositionRule::Decay {
                window_fraction,
                max,
                spread,
                tail_fraction,
                tail,
            } => {
                finite_non_negative("position.max", *max)?;
                finite_non_negative("position.tail", *tail)?;
                if !(spread.is_finite() && *spread >= 0.0 && *spread <= *max) {
                    return Err(format!(
                        "profile `{}`: position.spread must be within 0..=max",
                        self.name
                    ));
                }
                fraction(&self.name, "position.window_fraction", *window_fraction)?;
                fraction(&self.name, "position.tail_fraction", *tail_fraction)?;
            }
        }
        for band in &self.length {
            finite_non_negative("length.points", band.points)?;
        }
        match &self.title {
            TitleRule::Jaccard { weight } => finite_non_negative("title.weight", *weight)?,
            TitleRule::Coverage { max } => finite_non_negative("title.max", *max)?,
        }
        finite_non_negative("key_phrase", self.key_phrase)?;
        if let Some(c) = &self.cue_phrases {
            finite_non_negative("cue_phrases.per_hit", c.per_hit)?;
            finite_non_negative("cue_phrases.max", c.max)?;
        }
        if let Some(e) = &self.entity_cues {
            finite_non_negative("entity_cues.per_hit", e.per_hit)?;
            finite_non_negative("entity_cues.max", e.max)?;
        }
        finite_non_negative("quotation", self.quotation)?;
        finite_non_negative("numeric", self.numeric)
    }
}

fn fraction(profile: &str, label: &str, v: f64) -> Result<(), String> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(format!("profile `{profile}`: {label} must be within 0..=1"))
    }
}

/* ----------------------------
Ranking
---------------------------- */

/// Per-article inputs shared by every sentence score. Built once per call.
#[derive(Debug)]
pub struct RankContext<'a> {
    pub sentences: &'a [String],
    pub title: &'a str,
    title_tokens: HashSet<String>,
    key_phrases: Vec<String>,
}

impl<'a> RankContext<'a> {
    pub fn new(sentences: &'a [String], title: &'a str, features: &FeatureBag) -> Self {
        Self {
            sentences,
            title,
            title_tokens: token_set(title),
            key_phrases: features.key_phrases(),
        }
    }
}

/// A sentence with its original index and capped importance score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSentence {
    pub index: usize,
    pub sentence: String,
    pub score: f64,
}

/// Uncapped per-signal contributions, mostly for inspection and tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SignalBreakdown {
    pub position: f64,
    pub length: f64,
    pub title: f64,
    pub key_phrases: f64,
    pub cue_phrases: f64,
    pub entity_cues: f64,
    pub quotation: f64,
    pub numeric: f64,
}

impl SignalBreakdown {
    pub fn sum(&self) -> f64 {
        self.position
            + self.length
            + self.title
            + self.key_phrases
            + self.cue_phrases
            + self.entity_cues
            + self.quotation
            + self.numeric
    }
}

#[derive(Debug, Clone)]
pub struct SentenceRanker {
    profile: RankerProfile,
}

impl Default for SentenceRanker {
    fn default() -> Self {
        Self::new(RankerProfile::advanced())
    }
}

impl SentenceRanker {
    pub fn new(profile: RankerProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &RankerProfile {
        &self.profile
    }

    pub fn breakdown(&self, ctx: &RankContext<'_>, index: usize) -> SignalBreakdown {
        let p = &self.profile;
        let sentence = ctx.sentences[index].as_str();
        let lower = sentence.to_lowercase();

        let key_phrases = if p.key_phrase > 0.0 {
            let hits = ctx
                .key_phrases
                .iter()
                .filter(|phrase| lower.contains(phrase.as_str()))
                .count();
            hits as f64 * p.key_phrase
        } else {
            0.0
        };

        let cue_phrases = p.cue_phrases.as_ref().map_or(0.0, |c| {
            let hits = c
                .phrases
                .iter()
                .filter(|phrase| lower.contains(phrase.to_lowercase().as_str()))
                .count();
            (hits as f64 * c.per_hit).min(c.max)
        });

        let entity_cues = p.entity_cues.as_ref().map_or(0.0, |e| {
            (patterns::legacy_entity_hits(sentence) as f64 * e.per_hit).min(e.max)
        });

        SignalBreakdown {
            position: position_score(&p.position, index, ctx.sentences.len()),
            length: length_score(&p.length, word_count(sentence)),
            title: title_score(&p.title, sentence, &ctx.title_tokens),
            key_phrases,
            cue_phrases,
            entity_cues,
            quotation: if patterns::has_quotation(sentence) {
                p.quotation
            } else {
                0.0
            },
            numeric: if patterns::has_numeric(sentence) {
                p.numeric
            } else {
                0.0
            },
        }
    }

    /// Capped score in `[0, cap]`.
    pub fn score(&self, ctx: &RankContext<'_>, index: usize) -> f64 {
        self.breakdown(ctx, index).sum().clamp(0.0, self.profile.cap)
    }

    /// Score every sentence in order. Fails if a score is not finite, which can only
    /// happen with a broken custom profile.
    pub fn rank_all(&self, ctx: &RankContext<'_>) -> Result<Vec<ScoredSentence>, SummarizeError> {
        (0..ctx.sentences.len())
            .map(|index| {
                let score = self.score(ctx, index);
                if !score.is_finite() {
                    return Err(SummarizeError::Extraction(format!(
                        "non-finite score for sentence {index} under profile `{}`",
                        self.profile.name
                    )));
                }
                Ok(ScoredSentence {
                    index,
                    sentence: ctx.sentences[index].clone(),
                    score,
                })
            })
            .collect()
    }
}

fn position_score(rule: &PositionRule, index: usize, total: usize) -> f64 {
    let (i, n) = (index as f64, total as f64);
    match *rule {
        PositionRule::Banded {
            first,
            head_fraction,
            head,
            body_fraction,
            body,
        } => {
            if index == 0 {
                first
            } else if i < n * head_fraction {
                head
            } else if i < n * body_fraction {
                body
            } else {
                0.0
            }
        }
        PositionRule::Decay {
            window_fraction,
            max,
            spread,
            tail_fraction,
            tail,
        } => {
            let window = n * window_fraction;
            if i < window {
                max - (i / window) * spread
            } else if i > n * tail_fraction {
                tail
            } else {
                0.0
            }
        }
    }
}

fn length_score(bands: &[LengthBand], words: usize) -> f64 {
    bands
        .iter()
        .find(|b| (b.min_words..=b.max_words).contains(&words))
        .map_or(0.0, |b| b.points)
}

fn title_score(rule: &TitleRule, sentence: &str, title_tokens: &HashSet<String>) -> f64 {
    match *rule {
        TitleRule::Jaccard { weight } => weight * jaccard(&token_set(sentence), title_tokens),
        TitleRule::Coverage { max } => {
            if title_tokens.is_empty() {
                return 0.0;
            }
            let sentence_tokens = token_set(sentence);
            let common = title_tokens.intersection(&sentence_tokens).count();
            (common as f64 / title_tokens.len() as f64 * max).min(max)
        }
    }
}
