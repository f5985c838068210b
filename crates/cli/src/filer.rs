//! The SQLite backed filer.
//!
//! One [`SqliteFiler`] plays every filer role the mount orchestrator needs:
//! it resolves remote storage configurations, knows the buckets root, pulls
//! remote listings into `filer_entries` and keeps the mount mappings.

use std::sync::Arc;

use common::filer::{FilerConfig, FilerError, MetadataSync, MountMappingStore};
use common::path::FullPath;
use common::remote::{
    ConfigStoreError, MountMapping, RemoteConfigStore, RemoteStorageConfig,
    RemoteStorageConnector, RemoteStorageError, RemoteStorageLocation,
};

use crate::database::{Database, EntryChange};

#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error("directory {0} is not empty")]
    DirectoryNotEmpty(FullPath),

    #[error(transparent)]
    Remote(#[from] RemoteStorageError),

    #[error("filer database: {0}")]
    Database(#[from] sqlx::Error),
}

/// Entry counts from one metadata pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl PullSummary {
    fn record(&mut self, change: EntryChange) {
        match change {
            EntryChange::Created => self.created += 1,
            EntryChange::Updated => self.updated += 1,
            EntryChange::Unchanged => self.unchanged += 1,
        }
    }
}

#[derive(Clone)]
pub struct SqliteFiler {
    db: Database,
    buckets_root: FullPath,
    remotes: Arc<dyn RemoteStorageConnector>,
}

impl SqliteFiler {
    pub fn new(
        db: Database,
        buckets_root: FullPath,
        remotes: Arc<dyn RemoteStorageConnector>,
    ) -> Self {
        Self {
            db,
            buckets_root,
            remotes,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Copy the recursive listing at `location` into `target_dir`.
    ///
    /// Object keys are taken relative to the location path. Keys ending in
    /// `/` become directories. Entries are only ever added or updated.
    pub async fn pull_metadata(
        &self,
        target_dir: &FullPath,
        is_mount: bool,
        config: &RemoteStorageConfig,
        location: &RemoteStorageLocation,
    ) -> Result<PullSummary, PullError> {
        if !is_mount && self.db.has_children(target_dir).await? {
            return Err(PullError::DirectoryNotEmpty(target_dir.clone()));
        }

        let mut summary = PullSummary::default();
        for dir in target_dir.ancestors().iter().rev() {
            self.ensure_directory(dir, &mut summary).await?;
        }
        self.ensure_directory(target_dir, &mut summary).await?;

        let client = self.remotes.connect(config).await?;
        let objects = client.list_objects(location).await?;
        tracing::debug!(
            location = %location,
            count = objects.len(),
            "pulling remote metadata"
        );

        let key_prefix = location.key_prefix().trim_end_matches('/');
        for object in &objects {
            let is_dir = object.key.ends_with('/');
            let segments: Vec<&str> = object.key.split('/').filter(|s| !s.is_empty()).collect();
            let Some((last, intermediate)) = segments.split_last() else {
                continue;
            };

            let mut parent = target_dir.clone();
            for segment in intermediate {
                parent = parent.child(segment);
                self.ensure_directory(&parent, &mut summary).await?;
            }

            let path = parent.child(last);
            if is_dir {
                self.ensure_directory(&path, &mut summary).await?;
                continue;
            }

            let remote_key = if key_prefix.is_empty() {
                object.key.clone()
            } else {
                format!("{}/{}", key_prefix, object.key)
            };
            let change = self
                .db
                .upsert_remote_file(&path, object, location, &remote_key)
                .await?;
            summary.record(change);
        }

        tracing::info!(
            dir = %target_dir,
            location = %location,
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            "pulled remote metadata"
        );
        Ok(summary)
    }

    async fn ensure_directory(
        &self,
        dir: &FullPath,
        summary: &mut PullSummary,
    ) -> Result<(), sqlx::Error> {
        if self.db.ensure_directory(dir).await? {
            summary.record(EntryChange::Created);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteConfigStore for SqliteFiler {
    async fn read_remote_storage_config(
        &self,
        name: &str,
    ) -> Result<RemoteStorageConfig, ConfigStoreError> {
        match self.db.get_remote_storage_config(name).await {
            Ok(Some(config)) => Ok(config),
            Ok(None) => Err(ConfigStoreError::NotFound(name.to_string())),
            Err(e) => Err(ConfigStoreError::BackendUnavailable(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl FilerConfig for SqliteFiler {
    async fn buckets_root(&self) -> Result<FullPath, FilerError> {
        Ok(self.buckets_root.clone())
    }
}

#[async_trait::async_trait]
impl MetadataSync for SqliteFiler {
    async fn sync_metadata(
        &self,
        target_dir: &FullPath,
        is_mount: bool,
        config: &RemoteStorageConfig,
        location: &RemoteStorageLocation,
    ) -> Result<(), FilerError> {
        self.pull_metadata(target_dir, is_mount, config, location)
            .await
            .map(|_| ())
            .map_err(FilerError::new)
    }
}

#[async_trait::async_trait]
impl MountMappingStore for SqliteFiler {
    async fn insert_mount_mapping(
        &self,
        dir: &FullPath,
        location: &RemoteStorageLocation,
    ) -> Result<(), FilerError> {
        self.db
            .upsert_mount_mapping(dir, location)
            .await
            .map_err(FilerError::new)
    }

    async fn list_mount_mappings(&self) -> Result<Vec<MountMapping>, FilerError> {
        self.db.list_mount_mappings().await.map_err(FilerError::new)
    }
}
