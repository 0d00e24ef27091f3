//! File-backed record store: one JSON array, append-only.
//!
//! Mirrors the shape the extension kept in local storage — a single array of
//! author records — so an existing file can be read back directly. A corrupt
//! file is treated as empty rather than fatal; scraping should never be
//! blocked by a bad byte on disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use xhs_core::AuthorRecord;

use crate::error::ScrapeError;
use crate::ports::AuthorStore;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads every stored record. A missing file is an empty store; an
    /// unparseable file is logged and also treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::StoreIo`] on I/O failures other than the file
    /// not existing.
    pub async fn read_all(&self) -> Result<Vec<AuthorRecord>, ScrapeError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    %err,
                    path = %self.path.display(),
                    "store file unreadable; treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, records: &[AuthorRecord]) -> Result<(), ScrapeError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        // Write-then-rename so a crash mid-write never truncates the store.
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &bytes)
            .await
            .map_err(|err| self.io_error(err))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|err| self.io_error(err))
    }

    fn io_error(&self, source: std::io::Error) -> ScrapeError {
        ScrapeError::StoreIo {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl AuthorStore for JsonFileStore {
    async fn append(&self, record: &AuthorRecord) -> Result<(), ScrapeError> {
        let mut records = self.read_all().await?;
        if records.iter().any(|existing| existing.id == record.id) {
            tracing::debug!(id = %record.id, "record already stored; append is a no-op");
            return Ok(());
        }
        records.push(record.clone());
        self.write_all(&records).await?;
        tracing::info!(
            id = %record.id,
            user_name = %record.profile.user_name,
            total = records.len(),
            "author record stored"
        );
        Ok(())
    }
}
