// src/config/mod.rs
//! Summarizer configuration (TOML).
//!
//! Resolution:
//! 1) `$SUMMARIZER_CONFIG_PATH`
//! 2) `config/summarizer.toml`
//! 3) built-in defaults when the file does not exist
//!
//! A file that exists but does not parse or validate is an error. `SUMMARIZER_TIMEOUT_MS`
//! overrides `[service].timeout_ms`.

pub mod hot_reload;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::rank::{ProfileName, RankerProfile};

pub use hot_reload::HotReloadConfig;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/summarizer.toml";
pub const ENV_CONFIG_PATH: &str = "SUMMARIZER_CONFIG_PATH";
pub const ENV_TIMEOUT_MS: &str = "SUMMARIZER_TIMEOUT_MS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub selection: SelectionConfig,
    pub fallback: FallbackConfig,
    pub features: FeatureConfig,
    pub ranking: RankingConfig,
    pub service: ServiceConfig,
}

/// How many sentences to keep and how to group them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Share of the article's sentences to keep before clamping.
    pub ratio: f64,
    pub min_sentences: usize,
    pub max_sentences: usize,
    pub max_paragraph_sentences: usize,
    /// Adjacent selected sentences less similar than this start a new paragraph.
    pub topic_shift_threshold: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            ratio: 0.3,
            min_sentences: 12,
            max_sentences: 18,
            max_paragraph_sentences: 4,
            topic_shift_threshold: 0.2,
        }
    }
}

impl SelectionConfig {
    /// `clamp(ceil(ratio × n), min, max)`, never more than `n`.
    pub fn target_count(&self, sentence_count: usize) -> usize {
        let wanted = (self.ratio * sentence_count as f64).ceil() as usize;
        wanted
            .clamp(self.min_sentences, self.max_sentences)
            .min(sentence_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    /// The condenser runs only for bodies longer than this many characters.
    pub min_chars: usize,
    pub sentences: usize,
    /// Bodies with more sentences than this skip the digest.
    pub max_input_sentences: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_chars: 10_000,
            sentences: crate::condense::DEFAULT_FALLBACK_SENTENCES,
            max_input_sentences: crate::condense::MAX_GRAPH_SENTENCES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub keyword_limit: usize,
    pub intro_people: usize,
    pub intro_organizations: usize,
    pub intro_places: usize,
    pub intro_numbers: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            keyword_limit: crate::analyze::DEFAULT_KEYWORD_LIMIT,
            intro_people: 2,
            intro_organizations: 2,
            intro_places: 2,
            intro_numbers: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub profile: ProfileName,
    /// Full signal table; takes precedence over `profile` when present.
    pub custom: Option<RankerProfile>,
}

impl RankingConfig {
    pub fn resolve(&self) -> RankerProfile {
        self.custom
            .clone()
            .unwrap_or_else(|| self.profile.profile())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Soft budget for one summarization request.
    pub timeout_ms: u64,
    pub cache_ttl_secs: u64,
    pub cache_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            cache_ttl_secs: 3_600,
            cache_capacity: 512,
        }
    }
}

impl SummarizerConfig {
    /// Load using `SUMMARIZER_CONFIG_PATH` or the default path, then apply env overrides.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut cfg = if path.exists() {
            Self::load_from(&path)?
        } else {
            info!(target: "summarizer", path = %path.display(), "no config file, using defaults");
            Self::default()
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading summarizer config from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing summarizer config at {}", path.display()))
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let cfg: SummarizerConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.selection;
        if !(s.ratio.is_finite() && s.ratio > 0.0 && s.ratio <= 1.0) {
            return Err(anyhow!("selection.ratio must be within (0, 1]"));
        }
        if s.min_sentences == 0 || s.min_sentences > s.max_sentences {
            return Err(anyhow!(
                "selection.min_sentences must be >= 1 and <= selection.max_sentences"
            ));
        }
        if s.max_paragraph_sentences == 0 {
            return Err(anyhow!("selection.max_paragraph_sentences must be >= 1"));
        }
        if !(0.0..=1.0).contains(&s.topic_shift_threshold) {
            return Err(anyhow!("selection.topic_shift_threshold must be within 0..=1"));
        }
        if self.fallback.sentences == 0 {
            return Err(anyhow!("fallback.sentences must be >= 1"));
        }
        if self.fallback.max_input_sentences < 2 {
            return Err(anyhow!("fallback.max_input_sentences must be >= 2"));
        }
        if self.service.timeout_ms == 0 {
            return Err(anyhow!("service.timeout_ms must be >= 1"));
        }
        self.ranking.resolve().validate().map_err(|e| anyhow!(e))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(ms) = parse_timeout_env(std::env::var(ENV_TIMEOUT_MS).ok()) {
            self.service.timeout_ms = ms;
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

// parse optional millisecond env, at least 1ms
fn parse_timeout_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).map(|v| v.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_count_bounds() {
        let s = SelectionConfig::default();
        assert_eq!(s.target_count(5), 5);
        assert_eq!(s.target_count(12), 12);
        assert_eq!(s.target_count(30), 12);
        assert_eq!(s.target_count(50), 15);
        assert_eq!(s.target_count(57), 18);
        assert_eq!(s.target_count(200), 18);
        assert_eq!(s.target_count(0), 0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = SummarizerConfig::from_toml_str(
            r#"
            [selection]
            max_sentences = 20

            [ranking]
            profile = "legacy"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.selection.max_sentences, 20);
        assert_eq!(cfg.selection.min_sentences, 12);
        assert_eq!(cfg.fallback.min_chars, 10_000);
        assert_eq!(cfg.ranking.resolve().name, "legacy");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(SummarizerConfig::from_toml_str("[selection]\nratio = 0.0").is_err());
        assert!(SummarizerConfig::from_toml_str(
            "[selection]\nmin_sentences = 20\nmax_sentences = 10"
        )
        .is_err());
        assert!(SummarizerConfig::from_toml_str("[ranking]\nprofile = \"fancy\"").is_err());
    }

    #[test]
    fn timeout_env_parsing() {
        assert_eq!(parse_timeout_env(Some(" 250 ".into())), Some(250));
        assert_eq!(parse_timeout_env(Some("0".into())), Some(1));
        assert_eq!(parse_timeout_env(Some("soon".into())), None);
        assert_eq!(parse_timeout_env(None), None);
    }
}
