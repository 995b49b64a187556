//! Pipeline error taxonomy
//!
//! Every failure of the summarization pipeline is classified once and
//! returned unchanged to the caller. Only persistence failures are wrapped,
//! because they happen after extraction and generation work has been spent.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Summarization pipeline error
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Document, binary or summary absent
    #[error("{0} not found")]
    NotFound(String),

    /// Document past its access window
    #[error("Document {document_id} expired at {expired_at}")]
    Expired {
        document_id: Uuid,
        expired_at: DateTime<Utc>,
    },

    /// Binary could not be parsed as a PDF
    #[error("The file is not a valid PDF document: {0}")]
    Corrupt(String),

    /// Parsed, but no text could be extracted
    #[error("No text could be extracted from the document")]
    EmptyContent,

    /// Summary generator failure
    #[error("Summary generation failed: {0}")]
    ProcessingFailure(String),

    /// Store write failed after a summary was generated
    #[error("Failed to save summary for document {document_id}: {source}")]
    PersistenceFailure {
        document_id: Uuid,
        #[source]
        source: StoreError,
    },

    /// Storage read failed (registry lookup or summary fetch)
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),
}

impl SummaryError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Expired { .. } => StatusCode::GONE,
            Self::Corrupt(_) | Self::EmptyContent => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ProcessingFailure(_) | Self::PersistenceFailure { .. } | Self::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Expired { .. } => "expired",
            Self::Corrupt(_) => "corrupt_document",
            Self::EmptyContent => "empty_content",
            Self::ProcessingFailure(_) => "processing_failure",
            Self::PersistenceFailure { .. } => "persistence_failure",
            Self::Storage(_) => "storage_failure",
        }
    }

    /// Message safe to show to an end user
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) | Self::Corrupt(_) | Self::EmptyContent => self.to_string(),
            Self::Expired { .. } => "Document has expired".to_string(),
            Self::ProcessingFailure(_) => {
                "An error occurred while generating the summary".to_string()
            }
            Self::PersistenceFailure { .. } => {
                "An error occurred while saving the summary, please try again later".to_string()
            }
            Self::Storage(_) => "Storage is temporarily unavailable".to_string(),
        }
    }
}

/// Read-path conversion: a missing record becomes `NotFound`
impl From<StoreError> for SummaryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(document_id) => {
                SummaryError::NotFound(format!("Summary for document {}", document_id))
            }
            other => SummaryError::Storage(other),
        }
    }
}
