//! Narrative generation seam.
//!
//! The integrated-analysis section is produced by an external language
//! model. From this crate's point of view that collaborator is a single
//! capability: prompt in, prose out. It may be slow or down; a failure is
//! caught at the call site and the numeric report sections are returned
//! unchanged with a fixed explanatory string in place of the narrative.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),
    #[error("summarizer failed: {0}")]
    Failed(String),
}

/// External free-text summarization capability.
pub trait Summarize {
    fn summarize(&self, prompt: &str, model: &str) -> Result<String, SummarizeError>;
}

/// Placeholder used when no summarization backend is wired up (the CLI
/// never talks to the network; a service embedding this crate injects a
/// real implementation).
#[derive(Debug, Clone, Copy, Default)]
pub struct SummarizerUnavailable;

impl Summarize for SummarizerUnavailable {
    fn summarize(&self, _prompt: &str, _model: &str) -> Result<String, SummarizeError> {
        Err(SummarizeError::Unavailable(
            "no summarization backend configured".to_string(),
        ))
    }
}

/// Fixed text substituted for the narrative when the summarizer fails.
pub const NARRATIVE_FALLBACK: &str =
    "Unable to generate integrated analysis. The statistical sections above were computed \
     independently and are unaffected.";
