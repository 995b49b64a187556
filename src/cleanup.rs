//! Expired document sweeping
//!
//! Expired documents are already unreadable through the registry. The sweeper
//! reclaims their space: summary versions, binaries and finally the record.
//! The record goes last so a document whose cleanup failed is found again on
//! the next tick.

use std::io::ErrorKind;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::db::DocumentRepository;
use crate::document::Document;
use crate::pipeline::{SummaryError, SummaryService};
use crate::store::StoreError;

/// Outcome of one sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub documents: usize,
    pub binaries: usize,
    pub summaries: u64,
    /// Expired documents left in place for the next sweep
    pub deferred: usize,
}

/// Periodically removes expired documents
#[derive(Clone)]
pub struct ExpiredDocumentSweeper {
    documents: DocumentRepository,
    summaries: SummaryService,
    interval: Duration,
}

impl ExpiredDocumentSweeper {
    pub fn new(documents: DocumentRepository, summaries: SummaryService, interval: Duration) -> Self {
        Self {
            documents,
            summaries,
            interval,
        }
    }

    /// Remove everything that expired at or before `now`
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport, StoreError> {
        let expired = self.documents.list_expired(now).await?;
        let mut report = SweepReport::default();

        for document in expired {
            if let Err(e) = self.remove(&document, &mut report).await {
                report.deferred += 1;
                tracing::warn!(
                    document_id = %document.id,
                    "Expired document cleanup deferred: {}",
                    e
                );
            }
        }

        if report.documents > 0 || report.deferred > 0 {
            tracing::info!(
                documents = report.documents,
                binaries = report.binaries,
                summaries = report.summaries,
                deferred = report.deferred,
                "Purged expired documents"
            );
        }

        Ok(report)
    }

    async fn remove(&self, document: &Document, report: &mut SweepReport) -> Result<(), SummaryError> {
        report.summaries += self.summaries.purge(document.id).await?;

        match tokio::fs::remove_file(&document.storage_path).await {
            Ok(()) => report.binaries += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(SummaryError::Storage(e.into())),
        }

        if self.documents.delete(document.id).await? {
            report.documents += 1;
        }

        Ok(())
    }

    /// Start the background sweep loop
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);

            loop {
                interval.tick().await;
                if let Err(e) = self.sweep(Utc::now()).await {
                    tracing::error!("Expired document sweep failed: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::test_support::{test_state, write_pdf_fixture};
    use chrono::Duration as ChronoDuration;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn document(path: PathBuf, expires_in: ChronoDuration) -> Document {
        let now = Utc::now();
        Document {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "paper.pdf".to_string(),
            storage_path: path,
            size_bytes: 1,
            checksum: String::new(),
            uploaded_at: now - ChronoDuration::hours(24),
            expires_at: now + expires_in,
        }
    }

    #[tokio::test]
    async fn test_sweep_removes_expired_documents_and_their_summaries() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(temp_dir.path()).await;
        let docs_dir = &state.config().storage.documents_dir;

        let stale_path = write_pdf_fixture(docs_dir, "stale.pdf", &[&["stale words here"]]);
        let live_path = write_pdf_fixture(docs_dir, "live.pdf", &[&["live words here"]]);
        let stale = document(stale_path.clone(), ChronoDuration::minutes(10));
        let live = document(live_path.clone(), ChronoDuration::hours(5));
        state.documents().register(&stale).await.unwrap();
        state.documents().register(&live).await.unwrap();

        state.summaries().create_summary(stale.id).await.unwrap();
        state.summaries().create_summary(stale.id).await.unwrap();
        state.summaries().create_summary(live.id).await.unwrap();

        let sweeper = ExpiredDocumentSweeper::new(
            state.documents().clone(),
            state.summaries().clone(),
            Duration::from_secs(60),
        );

        // An hour from now only the stale document has expired
        let report = sweeper
            .sweep(Utc::now() + ChronoDuration::hours(1))
            .await
            .unwrap();

        assert_eq!(
            report,
            SweepReport {
                documents: 1,
                binaries: 1,
                summaries: 2,
                deferred: 0,
            }
        );
        assert!(!stale_path.exists());
        assert!(live_path.exists());
        assert!(state.documents().get(stale.id).await.unwrap().is_none());
        assert!(state.summaries().get_summary(live.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_binary_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(temp_dir.path()).await;
        let gone = document(temp_dir.path().join("never-written.pdf"), -ChronoDuration::minutes(1));
        state.documents().register(&gone).await.unwrap();

        let sweeper = ExpiredDocumentSweeper::new(
            state.documents().clone(),
            state.summaries().clone(),
            Duration::from_secs(60),
        );
        let report = sweeper.sweep(Utc::now()).await.unwrap();

        assert_eq!(report.documents, 1);
        assert_eq!(report.binaries, 0);
    }

    #[tokio::test]
    async fn test_failed_binary_removal_is_retried_next_sweep() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(temp_dir.path()).await;

        // A directory where the binary should be makes remove_file fail
        let stuck_path = state.config().storage.documents_dir.join("stuck.pdf");
        std::fs::create_dir(&stuck_path).unwrap();
        let stuck = document(stuck_path.clone(), -ChronoDuration::minutes(1));
        state.documents().register(&stuck).await.unwrap();

        let sweeper = ExpiredDocumentSweeper::new(
            state.documents().clone(),
            state.summaries().clone(),
            Duration::from_secs(60),
        );

        let first = sweeper.sweep(Utc::now()).await.unwrap();
        assert_eq!(first.documents, 0);
        assert_eq!(first.deferred, 1);
        assert!(state.documents().get(stuck.id).await.unwrap().is_some());

        std::fs::remove_dir(&stuck_path).unwrap();
        std::fs::write(&stuck_path, b"%PDF-1.7").unwrap();

        let second = sweeper.sweep(Utc::now()).await.unwrap();
        assert_eq!(second.documents, 1);
        assert_eq!(second.binaries, 1);
        assert_eq!(second.deferred, 0);
        assert!(!stuck_path.exists());
        assert!(state.documents().get(stuck.id).await.unwrap().is_none());
    }
}
