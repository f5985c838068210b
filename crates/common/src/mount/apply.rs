use crate::path::FullPath;
use crate::remote::{MountMapping, RemoteBucket, RemoteStorageConfig, RemoteStorageLocation};

use super::{mount_target, MountEnv, MountError};

/// Mount a single bucket: pull its metadata into the target directory, then
/// record the mapping.
///
/// The mapping is only written once the pull succeeded.
pub async fn apply_mount(
    env: &MountEnv<'_>,
    storage_name: &str,
    config: &RemoteStorageConfig,
    buckets_root: &FullPath,
    bucket: &RemoteBucket,
) -> Result<MountMapping, MountError> {
    let location = RemoteStorageLocation::bucket_root(storage_name, &bucket.name);
    let dir = mount_target(buckets_root, &bucket.name);

    tracing::info!(dir = %dir, location = %location, "pulling bucket metadata");
    if let Err(source) = env.metadata.sync_metadata(&dir, true, config, &location).await {
        return Err(MountError::Sync { location, source });
    }

    if let Err(source) = env.mappings.insert_mount_mapping(&dir, &location).await {
        return Err(MountError::Persist {
            dir,
            location,
            source,
        });
    }
    tracing::info!(dir = %dir, location = %location, "bucket mounted");

    Ok(MountMapping { dir, location })
}
