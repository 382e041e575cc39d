// src/lib.rs
// Public library surface for integration tests (and reuse behind other services).

pub mod analyze;
pub mod api;
pub mod assemble;
pub mod cache;
pub mod clean;
pub mod condense;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod rank;
pub mod similarity;
pub mod telemetry;
pub mod text;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{FeatureBag, FeatureExtractor, RuleBasedExtractor};
pub use crate::api::router;
pub use crate::condense::{Condenser, TextRankCondenser};
pub use crate::config::SummarizerConfig;
pub use crate::error::{CondenseError, SummarizeError};
pub use crate::pipeline::{summarize, Article, Summarizer, SummaryResult};
pub use crate::rank::{ProfileName, RankerProfile, SentenceRanker};
