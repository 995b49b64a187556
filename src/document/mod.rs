//! Uploaded documents and their access window
//!
//! A document is readable only before its expiration timestamp. Past that
//! it is logically gone, even while the binary is still on disk and the
//! record has not been swept yet. All timestamps are UTC.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pipeline::SummaryError;
use crate::store::StoreError;

/// Default access window after upload
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Uploaded document record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Display name, taken from the uploaded file name
    pub title: String,
    #[serde(skip)]
    pub storage_path: PathBuf,
    pub size_bytes: i64,
    /// SHA-256 of the stored binary, hex encoded
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Document {
    /// Whether the access window has closed at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Human readable time left, e.g. "12 hours, 30 minutes" or "Expired"
    pub fn time_remaining(&self, now: DateTime<Utc>) -> String {
        if self.is_expired_at(now) {
            return "Expired".to_string();
        }

        let total_minutes = (self.expires_at - now).num_minutes();
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;

        let minutes_part = format!(
            "{} {}",
            minutes,
            if minutes == 1 { "minute" } else { "minutes" }
        );
        if hours > 0 {
            format!(
                "{} {}, {}",
                hours,
                if hours == 1 { "hour" } else { "hours" },
                minutes_part
            )
        } else {
            minutes_part
        }
    }
}

/// Resolves document ids to stored binaries
#[async_trait]
pub trait DocumentRegistry: Send + Sync {
    /// Fetch a record regardless of its expiration
    async fn lookup(&self, document_id: Uuid) -> Result<Option<Document>, StoreError>;

    /// Fetch a record that is still inside its access window
    async fn resolve(&self, document_id: Uuid) -> Result<Document, SummaryError> {
        self.resolve_at(document_id, Utc::now()).await
    }

    /// `resolve` against an explicit clock
    async fn resolve_at(
        &self,
        document_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Document, SummaryError> {
        let document = self
            .lookup(document_id)
            .await
            .map_err(SummaryError::Storage)?
            .ok_or_else(|| {
                tracing::warn!(document_id = %document_id, "Document not found");
                SummaryError::NotFound(format!("Document {}", document_id))
            })?;

        if document.is_expired_at(now) {
            tracing::warn!(
                document_id = %document_id,
                expired_at = %document.expires_at,
                "Document expired"
            );
            return Err(SummaryError::Expired {
                document_id,
                expired_at: document.expires_at,
            });
        }

        Ok(document)
    }
}
