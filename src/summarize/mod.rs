//! Summary generation
//!
//! Generation is a pluggable strategy. The bundled [`TruncatingSummarizer`]
//! keeps the first N words of the extracted text; it is deterministic so the
//! rest of the pipeline can be tested against exact output.

use crate::pipeline::SummaryError;

/// Appended to a summary that was cut short
pub const TRUNCATION_MARKER: &str = "…";

/// Word limit used when none is configured
pub const DEFAULT_MAX_WORDS: usize = 100;

/// Turns extracted document text into summary text
pub trait Summarizer: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Produce a summary for non-empty `text`
    fn summarize(&self, text: &str) -> Result<String, SummaryError>;
}

/// Leading-words summarizer
#[derive(Debug, Clone)]
pub struct TruncatingSummarizer {
    max_words: usize,
}

impl TruncatingSummarizer {
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
        }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }
}

impl Default for TruncatingSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORDS)
    }
}

impl Summarizer for TruncatingSummarizer {
    fn name(&self) -> &'static str {
        "truncating"
    }

    fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        let mut words = text.split_whitespace();
        let kept: Vec<&str> = words.by_ref().take(self.max_words).collect();

        if kept.is_empty() {
            return Err(SummaryError::ProcessingFailure(
                "input text contains no words".to_string(),
            ));
        }

        // Short texts come back untouched, including their original spacing
        if words.next().is_none() {
            return Ok(text.to_string());
        }

        let mut summary = kept.join(" ");
        summary.push_str(TRUNCATION_MARKER);
        Ok(summary)
    }
}
