//! Summary orchestration

use std::sync::Arc;

use uuid::Uuid;

use super::SummaryError;
use crate::document::{Document, DocumentRegistry};
use crate::pdf::TextExtractor;
use crate::store::{Summary, SummaryStore};
use crate::summarize::Summarizer;

/// Runs the resolve → extract → summarize → save pipeline
///
/// Cheap to clone. Concurrent calls for the same document are allowed and
/// may duplicate work; the store keeps versions consistent.
#[derive(Clone)]
pub struct SummaryService {
    registry: Arc<dyn DocumentRegistry>,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    store: Arc<dyn SummaryStore>,
}

impl SummaryService {
    pub fn new(
        registry: Arc<dyn DocumentRegistry>,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
        store: Arc<dyn SummaryStore>,
    ) -> Self {
        Self {
            registry,
            extractor,
            summarizer,
            store,
        }
    }

    /// Generate and persist a new summary version
    pub async fn create_summary(&self, document_id: Uuid) -> Result<Summary, SummaryError> {
        let document = self.registry.resolve(document_id).await?;
        self.create_for(&document).await
    }

    async fn create_for(&self, document: &Document) -> Result<Summary, SummaryError> {
        let document_id = document.id;
        let text = self.extract(document).await?;

        let content = self.summarizer.summarize(&text)?;
        tracing::debug!(
            document_id = %document_id,
            summarizer = self.summarizer.name(),
            input_chars = text.len(),
            summary_chars = content.len(),
            "Generated summary"
        );

        let summary = self
            .store
            .save(document_id, &content)
            .await
            .map_err(|source| {
                tracing::error!(
                    document_id = %document_id,
                    "Failed to persist summary: {}",
                    source
                );
                SummaryError::PersistenceFailure {
                    document_id,
                    source,
                }
            })?;

        tracing::info!(
            document_id = %document_id,
            version = summary.version,
            "Created summary"
        );

        Ok(summary)
    }

    /// Current summary for a document
    pub async fn get_summary(&self, document_id: Uuid) -> Result<Summary, SummaryError> {
        Ok(self.store.get_current(document_id).await?)
    }

    /// Full version history, oldest first
    pub async fn list_versions(&self, document_id: Uuid) -> Result<Vec<Summary>, SummaryError> {
        Ok(self.store.list_versions(document_id).await?)
    }

    /// Remove every stored version for a document
    pub async fn purge(&self, document_id: Uuid) -> Result<u64, SummaryError> {
        Ok(self.store.purge(document_id).await?)
    }

    async fn extract(&self, document: &Document) -> Result<String, SummaryError> {
        let extractor = Arc::clone(&self.extractor);
        let location = document.storage_path.clone();

        tokio::task::spawn_blocking(move || extractor.extract(&location))
            .await
            .map_err(|e| SummaryError::ProcessingFailure(format!("extraction task failed: {}", e)))?
    }
}
