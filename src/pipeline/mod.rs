//! Summarization pipeline
//!
//! Composes the document registry, text extractor, summarizer and summary
//! store into a single service.

mod error;
mod service;

pub use error::SummaryError;
pub use service::SummaryService;
