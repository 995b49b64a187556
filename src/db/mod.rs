//! Database module for SQLite persistence
//!
//! Holds the document registry and the default summary store.

mod documents;
mod schema;
mod summaries;

pub use documents::DocumentRepository;
pub use schema::initialize_schema;
pub use summaries::SummaryRepository;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::store::StoreError;

/// Create a new database connection pool from a URL
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?;
    connect(options).await
}

/// Create a pool from explicit options and initialize the schema
pub async fn connect(options: SqliteConnectOptions) -> Result<SqlitePool, StoreError> {
    let options = options
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    initialize_schema(&pool).await?;

    Ok(pool)
}

/// Timestamps are stored as fixed-width RFC 3339 UTC text so that string
/// order matches time order.
pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidRecord(format!("bad timestamp {:?}: {}", raw, e)))
}

pub(crate) fn decode_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw)
        .map_err(|e| StoreError::InvalidRecord(format!("bad id {:?}: {}", raw, e)))
}

#[cfg(test)]
pub(crate) async fn test_pool(dir: &std::path::Path) -> SqlitePool {
    connect(SqliteConnectOptions::new().filename(dir.join("test.db")))
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_timestamp_round_trip_and_ordering() {
        let earlier = Utc::now();
        let later = earlier + Duration::milliseconds(1500);

        let a = encode_timestamp(&earlier);
        let b = encode_timestamp(&later);

        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(
            decode_timestamp(&a).unwrap().timestamp_micros(),
            earlier.timestamp_micros()
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_timestamp("yesterday"),
            Err(StoreError::InvalidRecord(_))
        ));
        assert!(decode_uuid("not-a-uuid").is_err());
    }
}
