//! File-backed summary store
//!
//! Each document's versions live in `<dir>/<document_id>.json`. A save
//! writes the complete version list to a temp file in the same directory and
//! renames it over the target, so readers see either the old list or the new
//! one. Writers are serialized by an in-process lock.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use uuid::Uuid;

use super::{StoreError, Summary, SummaryStore};

/// Summary store keeping one JSON file per document
#[derive(Clone)]
pub struct FileSummaryStore {
    inner: Arc<FileStoreInner>,
}

struct FileStoreInner {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSummaryStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            inner: Arc::new(FileStoreInner {
                dir,
                write_lock: Mutex::new(()),
            }),
        })
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&FileStoreInner) -> Result<T, StoreError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(inner.as_ref()))
            .await
            .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

impl FileStoreInner {
    fn path_for(&self, document_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", document_id))
    }

    fn read_versions(&self, document_id: Uuid) -> Result<Vec<Summary>, StoreError> {
        match fs::read(self.path_for(document_id)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_versions(&self, document_id: Uuid, versions: &[Summary]) -> Result<(), StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(tmp.as_file_mut(), versions)?;
        tmp.as_file_mut().flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(document_id))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn save(&self, document_id: Uuid, content: String) -> Result<Summary, StoreError> {
        let _guard = self.write_lock.lock();

        let mut versions = self.read_versions(document_id)?;
        let version = versions.iter().map(|s| s.version).max().unwrap_or(0) + 1;
        for existing in versions.iter_mut() {
            existing.is_current = false;
        }

        let summary = Summary {
            id: Uuid::new_v4(),
            document_id,
            content,
            version,
            is_current: true,
            created_at: Utc::now().trunc_subsecs(6),
        };
        versions.push(summary.clone());

        self.write_versions(document_id, &versions)?;
        Ok(summary)
    }

    fn purge(&self, document_id: Uuid) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock();

        let count = self.read_versions(document_id)?.len() as u64;
        match fs::remove_file(self.path_for(document_id)) {
            Ok(()) => Ok(count),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl SummaryStore for FileSummaryStore {
    async fn save(&self, document_id: Uuid, content: &str) -> Result<Summary, StoreError> {
        let content = content.to_owned();
        self.run(move |inner| inner.save(document_id, content)).await
    }

    async fn get_current(&self, document_id: Uuid) -> Result<Summary, StoreError> {
        let versions = self
            .run(move |inner| inner.read_versions(document_id))
            .await?;

        versions
            .iter()
            .find(|s| s.is_current)
            .or_else(|| versions.iter().max_by_key(|s| s.version))
            .cloned()
            .ok_or(StoreError::NotFound(document_id))
    }

    async fn list_versions(&self, document_id: Uuid) -> Result<Vec<Summary>, StoreError> {
        let mut versions = self
            .run(move |inner| inner.read_versions(document_id))
            .await?;
        versions.sort_by_key(|s| s.version);
        Ok(versions)
    }

    async fn purge(&self, document_id: Uuid) -> Result<u64, StoreError> {
        self.run(move |inner| inner.purge(document_id)).await
    }
}
