//! services/site/src/adapters/snapshot_file.rs
//!
//! This module contains the file adapter, which is the concrete implementation
//! of the `SnapshotRepository` port from the `core` crate. The snapshot lives
//! in one pretty-printed JSON file on local disk.

use async_trait::async_trait;
use nextdoor_core::ports::{PortError, PortResult, SnapshotRepository};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Stores the snapshot document at a fixed path.
///
/// Writes go to a uniquely named temp file next to the target and are then
/// renamed over it, so readers see either the old or the new document.
#[derive(Clone, Debug)]
pub struct FileSnapshotRepository {
    path: PathBuf,
}

impl FileSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the adapter and makes sure the containing directory exists.
    pub async fn open(path: impl Into<PathBuf>) -> PortResult<Self> {
        let repo = Self::new(path);
        tokio::fs::create_dir_all(repo.dir())
            .await
            .map_err(|e| io_error(repo.dir(), e))?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("snapshot.json");
        self.dir().join(format!("{}.tmp.{}", name, Uuid::new_v4()))
    }

    async fn write_temp(&self, temp: &Path, contents: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(temp).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        Ok(())
    }
}

fn io_error(path: &Path, e: std::io::Error) -> PortError {
    PortError::Io(format!("{}: {}", path.display(), e))
}

//=========================================================================================
// Port Implementation
//=========================================================================================

#[async_trait]
impl SnapshotRepository for FileSnapshotRepository {
    async fn get(&self) -> PortResult<Option<Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.path, e)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PortError::Corrupt(e.to_string()))
    }

    async fn put(&self, document: &Value) -> PortResult<()> {
        let dir = self.dir();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;

        let json = serde_json::to_string_pretty(document)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let temp = self.temp_path();
        if let Err(e) = self.write_temp(&temp, json.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_error(&temp, e));
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(io_error(&self.path, e));
        }

        debug!(path = %self.path.display(), "Snapshot persisted");
        Ok(())
    }
}
