use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RemoteStorageConfig, RemoteStorageLocation};

/// A bucket as reported by a remote listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteBucket {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl RemoteBucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: None,
        }
    }
}

/// An object as reported by a remote listing.
///
/// `key` is relative to the listed location and never starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub etag: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteStorageError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("bucket '{0}' does not exist")]
    BucketNotFound(String),
}

/// A connected client for one remote storage endpoint.
///
/// Listings are returned in full; a failure anywhere in a paginated
/// listing fails the whole call.
#[async_trait::async_trait]
pub trait RemoteStorageClient: Send + Sync {
    /// Every bucket visible with the configured credentials, in the
    /// order the provider reports them.
    async fn list_buckets(&self) -> Result<Vec<RemoteBucket>, RemoteStorageError>;

    /// Every object below `location`, recursively.
    async fn list_objects(
        &self,
        location: &RemoteStorageLocation,
    ) -> Result<Vec<RemoteObject>, RemoteStorageError>;
}

/// Builds a client for a configuration, dispatching on its provider.
#[async_trait::async_trait]
pub trait RemoteStorageConnector: Send + Sync {
    async fn connect(
        &self,
        config: &RemoteStorageConfig,
    ) -> Result<Box<dyn RemoteStorageClient>, RemoteStorageError>;
}
