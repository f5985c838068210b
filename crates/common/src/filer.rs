//! What the mount orchestrator needs from the filer.
//!
//! Failures coming back from the filer are opaque to the orchestrator; it
//! only wraps them with the directory or location it was working on.

use crate::path::FullPath;
use crate::remote::{MountMapping, RemoteStorageConfig, RemoteStorageLocation};

/// An opaque failure reported by a filer collaborator.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct FilerError(#[from] anyhow::Error);

impl FilerError {
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(anyhow::Error::new(err))
    }

    pub fn msg(message: impl std::fmt::Display) -> Self {
        Self(anyhow::anyhow!("{}", message))
    }
}

/// Filer wide settings.
#[async_trait::async_trait]
pub trait FilerConfig: Send + Sync {
    /// The directory every bucket mount lives under.
    async fn buckets_root(&self) -> Result<FullPath, FilerError>;
}

/// Materializes remote object listings as filer entries.
#[async_trait::async_trait]
pub trait MetadataSync: Send + Sync {
    /// Recursively pull the listing at `location` into `target_dir`.
    ///
    /// With `is_mount` set the target may already hold entries (a re-mount);
    /// otherwise it must be empty. Only metadata is copied, never content.
    async fn sync_metadata(
        &self,
        target_dir: &FullPath,
        is_mount: bool,
        config: &RemoteStorageConfig,
        location: &RemoteStorageLocation,
    ) -> Result<(), FilerError>;
}

/// Durable directory to remote location mappings.
#[async_trait::async_trait]
pub trait MountMappingStore: Send + Sync {
    /// Record `dir` as mounted on `location`, replacing any earlier mapping
    /// for the same directory.
    async fn insert_mount_mapping(
        &self,
        dir: &FullPath,
        location: &RemoteStorageLocation,
    ) -> Result<(), FilerError>;

    async fn list_mount_mappings(&self) -> Result<Vec<MountMapping>, FilerError>;
}
