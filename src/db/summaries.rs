//! Summary versions backed by SQLite

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{decode_timestamp, decode_uuid, encode_timestamp};
use crate::store::{StoreError, Summary, SummaryStore};

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: String,
    document_id: String,
    content: String,
    version: i64,
    is_current: bool,
    created_at: String,
}

impl TryFrom<SummaryRow> for Summary {
    type Error = StoreError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(Summary {
            id: decode_uuid(&row.id)?,
            document_id: decode_uuid(&row.document_id)?,
            content: row.content,
            version: row.version,
            is_current: row.is_current,
            created_at: decode_timestamp(&row.created_at)?,
        })
    }
}

/// Summary repository
#[derive(Clone)]
pub struct SummaryRepository {
    pool: SqlitePool,
}

impl SummaryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryStore for SummaryRepository {
    async fn save(&self, document_id: Uuid, content: &str) -> Result<Summary, StoreError> {
        let document_key = document_id.to_string();
        let mut tx = self.pool.begin().await?;

        // The demotion runs first so the transaction holds the write lock
        // before the next version number is read.
        sqlx::query("UPDATE summaries SET is_current = 0 WHERE document_id = ? AND is_current = 1")
            .bind(&document_key)
            .execute(&mut *tx)
            .await?;

        let (max_version,): (Option<i64>,) =
            sqlx::query_as("SELECT MAX(version) FROM summaries WHERE document_id = ?")
                .bind(&document_key)
                .fetch_one(&mut *tx)
                .await?;

        let summary = Summary {
            id: Uuid::new_v4(),
            document_id,
            content: content.to_string(),
            version: max_version.unwrap_or(0) + 1,
            is_current: true,
            created_at: Utc::now().trunc_subsecs(6),
        };

        sqlx::query(
            r#"
            INSERT INTO summaries (id, document_id, content, version, is_current, created_at)
            VALUES (?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(summary.id.to_string())
        .bind(&document_key)
        .bind(&summary.content)
        .bind(summary.version)
        .bind(encode_timestamp(&summary.created_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(summary)
    }

    async fn get_current(&self, document_id: Uuid) -> Result<Summary, StoreError> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, document_id, content, version, is_current, created_at
            FROM summaries
            WHERE document_id = ?
            ORDER BY is_current DESC, version DESC
            LIMIT 1
            "#,
        )
        .bind(document_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(document_id))?.try_into()
    }

    async fn list_versions(&self, document_id: Uuid) -> Result<Vec<Summary>, StoreError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, document_id, content, version, is_current, created_at
            FROM summaries
            WHERE document_id = ?
            ORDER BY version ASC
            "#,
        )
        .bind(document_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Summary::try_from).collect()
    }

    async fn purge(&self, document_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM summaries WHERE document_id = ?")
            .bind(document_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
