//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::{Config, SummaryBackend};
use crate::db::{DocumentRepository, SummaryRepository};
use crate::export::{ExportRenderer, PageGeometry};
use crate::pdf::MupdfTextExtractor;
use crate::pipeline::SummaryService;
use crate::store::{FileSummaryStore, StoreError, SummaryStore};
use crate::summarize::TruncatingSummarizer;

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to prepare document storage at {path}: {source}")]
    DocumentStorage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize summary store: {0}")]
    SummaryStore(#[from] StoreError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    db: SqlitePool,
    documents: DocumentRepository,
    summaries: SummaryService,
    renderer: ExportRenderer,
}

impl AppState {
    /// Wire up the pipeline for the configured summary backend
    pub fn new(config: Config, db: SqlitePool) -> Result<Self, StateError> {
        std::fs::create_dir_all(&config.storage.documents_dir).map_err(|source| {
            StateError::DocumentStorage {
                path: config.storage.documents_dir.display().to_string(),
                source,
            }
        })?;

        let store: Arc<dyn SummaryStore> = match config.summary.backend {
            SummaryBackend::Sqlite => Arc::new(SummaryRepository::new(db.clone())),
            SummaryBackend::File => Arc::new(FileSummaryStore::new(config.summary.dir.clone())?),
        };
        tracing::info!("Summary backend: {:?}", config.summary.backend);

        let documents = DocumentRepository::new(db.clone());
        let summaries = SummaryService::new(
            Arc::new(documents.clone()),
            Arc::new(MupdfTextExtractor::new()),
            Arc::new(TruncatingSummarizer::new(config.summary.max_words)),
            store,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                documents,
                summaries,
                renderer: ExportRenderer::new(PageGeometry::A4),
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the document registry
    pub fn documents(&self) -> &DocumentRepository {
        &self.inner.documents
    }

    /// Get the summarization pipeline
    pub fn summaries(&self) -> &SummaryService {
        &self.inner.summaries
    }

    /// Get the export renderer
    pub fn renderer(&self) -> &ExportRenderer {
        &self.inner.renderer
    }
}
