//! Versioned summary persistence
//!
//! A summary is never updated in place. Every generation inserts a new
//! version and demotes the previous current one, so a document keeps its
//! full history with exactly one authoritative record.
//!
//! Two backends implement [`SummaryStore`]:
//!
//! - [`crate::db::SummaryRepository`]: SQLite, one transaction per save
//! - [`FileSummaryStore`]: one JSON file per document, replaced atomically

mod file;

pub use file::FileSummaryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A stored summary version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    /// 1-based, increases by one per save for the same document
    pub version: i64,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
}

/// Storage-layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No summary stored for document {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Storage task failed: {0}")]
    Task(String),
}

/// Summary persistence backend
///
/// `save` must be atomic with respect to the current-version flag: the new
/// record is inserted as current and any previous current record is demoted
/// in the same unit of work.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Persist `content` as the next version for `document_id`
    async fn save(&self, document_id: Uuid, content: &str) -> Result<Summary, StoreError>;

    /// Current version for a document
    async fn get_current(&self, document_id: Uuid) -> Result<Summary, StoreError>;

    /// All versions for a document, oldest first
    async fn list_versions(&self, document_id: Uuid) -> Result<Vec<Summary>, StoreError>;

    /// Remove every version for a document, returning how many were removed
    async fn purge(&self, document_id: Uuid) -> Result<u64, StoreError>;
}
