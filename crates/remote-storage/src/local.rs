//! A local directory served as remote storage.
//!
//! ```text
//! <root>/
//!   logs-2023/          <- bucket
//!     2023/01/app.log   <- object "2023/01/app.log"
//!   media/              <- bucket
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use common::remote::{
    RemoteBucket, RemoteObject, RemoteProvider, RemoteStorageClient, RemoteStorageConfig,
    RemoteStorageError, RemoteStorageLocation,
};

use crate::error::from_io;
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct LocalClient {
    root: PathBuf,
}

impl LocalClient {
    pub fn new(config: &RemoteStorageConfig) -> Result<Self, RemoteStorageError> {
        match &config.provider {
            RemoteProvider::Local { path } => Ok(Self::with_root(path)),
            other => Err(RemoteStorageError::InvalidConfig(format!(
                "{} is a {} storage, not local",
                config.name,
                other.type_name()
            ))),
        }
    }

    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl RemoteStorageClient for LocalClient {
    /// Sub-directories of the root, sorted by name.
    async fn list_buckets(&self) -> Result<Vec<RemoteBucket>, RemoteStorageError> {
        let context = format!("read {}", self.root.display());
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| from_io(e, &context))?;

        let mut buckets = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| from_io(e, &context))? {
            let metadata = entry.metadata().await.map_err(|e| from_io(e, &context))?;
            if !metadata.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = ?entry.path(), "skipping bucket with non UTF-8 name");
                continue;
            };
            let created_at = metadata
                .created()
                .or_else(|_| metadata.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            buckets.push(RemoteBucket { name, created_at });
        }
        buckets.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(buckets)
    }

    async fn list_objects(
        &self,
        location: &RemoteStorageLocation,
    ) -> Result<Vec<RemoteObject>, RemoteStorageError> {
        let storage = Storage::local(&self.root.join(&location.bucket), &location.bucket)?;
        storage.list_objects(location).await
    }
}
