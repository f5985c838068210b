use crate::filer::FilerError;
use crate::path::FullPath;
use crate::remote::{ConfigStoreError, RemoteStorageError, RemoteStorageLocation};

/// A fatal failure of a mount run.
///
/// Each variant names the remote, directory or location being worked on
/// when the collaborator failed.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("find configuration for {remote}: {source}")]
    Config {
        remote: String,
        source: ConfigStoreError,
    },
    #[error("get storage client for {remote}: {source}")]
    Connect {
        remote: String,
        source: RemoteStorageError,
    },
    #[error("list buckets on {remote}: {source}")]
    ListBuckets {
        remote: String,
        source: RemoteStorageError,
    },
    #[error("read filer buckets path: {0}")]
    BucketsRoot(#[source] FilerError),
    #[error("list existing mounts: {0}")]
    ListMounts(#[source] FilerError),
    #[error("pull metadata on {location}: {source}")]
    Sync {
        location: RemoteStorageLocation,
        source: FilerError,
    },
    #[error("save mount mapping {dir} to {location}: {source}")]
    Persist {
        dir: FullPath,
        location: RemoteStorageLocation,
        source: FilerError,
    },
    #[error("write output: {0}")]
    Output(#[from] std::io::Error),
}
