//! Document registry backed by SQLite

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{decode_timestamp, decode_uuid, encode_timestamp};
use crate::document::{Document, DocumentRegistry};
use crate::store::StoreError;

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    user_id: String,
    title: String,
    file_path: String,
    file_size: i64,
    file_hash: String,
    uploaded_at: String,
    expires_at: String,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        Ok(Document {
            id: decode_uuid(&row.id)?,
            user_id: decode_uuid(&row.user_id)?,
            title: row.title,
            storage_path: PathBuf::from(row.file_path),
            size_bytes: row.file_size,
            checksum: row.file_hash,
            uploaded_at: decode_timestamp(&row.uploaded_at)?,
            expires_at: decode_timestamp(&row.expires_at)?,
        })
    }
}

const SELECT_DOCUMENT: &str = r#"
    SELECT id, user_id, title, file_path, file_size, file_hash, uploaded_at, expires_at
    FROM documents
"#;

/// Document repository
#[derive(Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a freshly stored upload
    pub async fn register(&self, document: &Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (id, user_id, title, file_path, file_size, file_hash, uploaded_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(document.id.to_string())
        .bind(document.user_id.to_string())
        .bind(&document.title)
        .bind(document.storage_path.to_string_lossy().into_owned())
        .bind(document.size_bytes)
        .bind(&document.checksum)
        .bind(encode_timestamp(&document.uploaded_at))
        .bind(encode_timestamp(&document.expires_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a document record
    pub async fn get(&self, document_id: Uuid) -> Result<Option<Document>, StoreError> {
        let query = format!("{} WHERE id = ?", SELECT_DOCUMENT);
        let row = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(document_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Document::try_from).transpose()
    }

    /// List a user's documents, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Document>, StoreError> {
        let query = format!("{} WHERE user_id = ? ORDER BY uploaded_at DESC", SELECT_DOCUMENT);
        let rows = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Document::try_from).collect()
    }

    /// Records whose access window closed at or before `now`
    ///
    /// Rows that fail to decode are logged and skipped.
    pub async fn list_expired(&self, now: DateTime<Utc>) -> Result<Vec<Document>, StoreError> {
        let query = format!("{} WHERE expires_at <= ? ORDER BY expires_at", SELECT_DOCUMENT);
        let rows = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(encode_timestamp(&now))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match Document::try_from(row) {
                    Ok(document) => Some(document),
                    Err(e) => {
                        tracing::warn!("Skipping undecodable document row {}: {}", id, e);
                        None
                    }
                }
            })
            .collect())
    }

    /// Delete a single record, returning whether it existed
    pub async fn delete(&self, document_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(document_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DocumentRegistry for DocumentRepository {
    async fn lookup(&self, document_id: Uuid) -> Result<Option<Document>, StoreError> {
        self.get(document_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::pipeline::SummaryError;
    use chrono::{Duration, SubsecRound};
    use tempfile::TempDir;

    fn make_document(expires_in: Duration) -> Document {
        let uploaded_at = Utc::now().trunc_subsecs(6);
        Document {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Attention Is All You Need.pdf".to_string(),
            storage_path: PathBuf::from("/data/documents/paper.pdf"),
            size_bytes: 2048,
            checksum: "ab".repeat(32),
            uploaded_at,
            expires_at: uploaded_at + expires_in,
        }
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(test_pool(temp_dir.path()).await);
        let document = make_document(Duration::hours(24));

        repo.register(&document).await.unwrap();

        let resolved = repo.resolve(document.id).await.unwrap();
        assert_eq!(resolved, document);
    }

    #[tokio::test]
    async fn test_resolve_unknown_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(test_pool(temp_dir.path()).await);

        let result = repo.resolve(Uuid::new_v4()).await;
        assert!(matches!(result, Err(SummaryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_resolve_past_expiration_is_expired_not_missing() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(test_pool(temp_dir.path()).await);
        let document = make_document(-Duration::hours(1));
        repo.register(&document).await.unwrap();

        let result = repo.resolve(document.id).await;
        assert!(matches!(result, Err(SummaryError::Expired { document_id, .. }) if document_id == document.id));

        // lookup ignores the access window
        assert!(repo.lookup(document.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_expired_keeps_live_documents_out() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(test_pool(temp_dir.path()).await);
        let live = make_document(Duration::hours(2));
        let stale = make_document(-Duration::minutes(1));
        repo.register(&live).await.unwrap();
        repo.register(&stale).await.unwrap();

        let expired = repo.list_expired(Utc::now()).await.unwrap();

        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, stale.id);
        // Listing never deletes
        assert!(repo.get(stale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(test_pool(temp_dir.path()).await);
        let document = make_document(Duration::hours(1));
        repo.register(&document).await.unwrap();

        assert!(repo.delete(document.id).await.unwrap());
        assert!(!repo.delete(document.id).await.unwrap());
        assert!(repo.get(document.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DocumentRepository::new(test_pool(temp_dir.path()).await);
        let first = make_document(Duration::hours(1));
        let mut second = make_document(Duration::hours(1));
        second.user_id = first.user_id;
        second.uploaded_at = first.uploaded_at + Duration::seconds(5);
        repo.register(&first).await.unwrap();
        repo.register(&second).await.unwrap();
        repo.register(&make_document(Duration::hours(1))).await.unwrap();

        let listed = repo.list_for_user(first.user_id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
