//! Classified errors for the summarization pipeline.
//!
//! - `SummarizeError` is what callers of [`crate::summarize`] see.
//! - `CondenseError` stays inside the pipeline: the fallback stage is optional and its
//!   failures are logged and dropped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SummarizeError {
    /// Body text was empty or whitespace only. Callers usually fall back to the
    /// article's short description.
    #[error("article body is empty")]
    EmptyInput,

    /// Feature extraction or ranking failed; the primary summary is undefined.
    #[error("summarization failed: {0}")]
    Extraction(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CondenseError {
    #[error("need at least {needed} sentences to rank, found {found}")]
    TooFewSentences { needed: usize, found: usize },

    #[error("sentence graph has no rankable content")]
    EmptyGraph,

    #[error("{found} sentences exceed the condenser limit of {limit}")]
    TooManySentences { limit: usize, found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        assert_eq!(SummarizeError::EmptyInput.to_string(), "article body is empty");
        assert_eq!(
            SummarizeError::Extraction("boom".into()).to_string(),
            "summarization failed: boom"
        );
        assert_eq!(
            CondenseError::TooFewSentences { needed: 2, found: 1 }.to_string(),
            "need at least 2 sentences to rank, found 1"
        );
        assert_eq!(
            CondenseError::TooManySentences { limit: 600, found: 8000 }.to_string(),
            "8000 sentences exceed the condenser limit of 600"
        );
    }
}
