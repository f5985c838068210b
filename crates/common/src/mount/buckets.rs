use std::collections::BTreeMap;
use std::io::Write;

use crate::filer::{FilerConfig, MetadataSync, MountMappingStore};
use crate::remote::{MountMapping, RemoteConfigStore, RemoteStorageConnector};

use super::{apply_mount, filter_buckets, MountError};

/// The collaborators a mount run talks to.
#[derive(Clone, Copy)]
pub struct MountEnv<'a> {
    pub configs: &'a dyn RemoteConfigStore,
    pub remotes: &'a dyn RemoteStorageConnector,
    pub filer: &'a dyn FilerConfig,
    pub metadata: &'a dyn MetadataSync,
    pub mappings: &'a dyn MountMappingStore,
}

impl<'a> MountEnv<'a> {
    /// Wire an environment where one value plays every filer role.
    pub fn new<F>(
        configs: &'a dyn RemoteConfigStore,
        remotes: &'a dyn RemoteStorageConnector,
        filer: &'a F,
    ) -> Self
    where
        F: FilerConfig + MetadataSync + MountMappingStore + 'a,
    {
        Self {
            configs,
            remotes,
            filer,
            metadata: filer,
            mappings: filer,
        }
    }
}

/// One invocation of the bucket mount command.
#[derive(Debug, Clone, Default)]
pub struct MountBuckets {
    /// Remote storage name; empty lists the existing mounts instead
    pub remote: String,
    /// Wildcard pattern on bucket names; empty matches all
    pub bucket_pattern: String,
    /// Mount the matched buckets; otherwise only report them
    pub apply: bool,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountReport {
    /// No remote given: the mappings already in place
    Existing(Vec<MountMapping>),
    Buckets {
        /// Every bucket that passed the filter, in listing order
        matched: Vec<String>,
        /// Mappings written by this run, empty on a dry run
        mounted: Vec<MountMapping>,
    },
}

impl MountBuckets {
    /// Run the command, writing one `bucket <name>` line per matched bucket
    /// to `out` as it goes.
    ///
    /// Stops at the first failure. Buckets mounted earlier in the same run
    /// are left in place.
    pub async fn run<W>(&self, env: &MountEnv<'_>, out: &mut W) -> Result<MountReport, MountError>
    where
        W: Write + Send,
    {
        if self.remote.is_empty() {
            return list_existing_mounts(env, out).await;
        }
        let remote = self.remote.as_str();

        let config = env
            .configs
            .read_remote_storage_config(remote)
            .await
            .map_err(|source| MountError::Config {
                remote: remote.to_string(),
                source,
            })?;

        let client = env
            .remotes
            .connect(&config)
            .await
            .map_err(|source| MountError::Connect {
                remote: remote.to_string(),
                source,
            })?;

        let buckets = client
            .list_buckets()
            .await
            .map_err(|source| MountError::ListBuckets {
                remote: remote.to_string(),
                source,
            })?;
        tracing::debug!(remote = %remote, count = buckets.len(), "listed remote buckets");

        let buckets_root = env
            .filer
            .buckets_root()
            .await
            .map_err(MountError::BucketsRoot)?;

        let mut matched = Vec::new();
        let mut mounted = Vec::new();
        for bucket in filter_buckets(buckets, &self.bucket_pattern) {
            writeln!(out, "bucket {}", bucket.name)?;
            out.flush()?;
            matched.push(bucket.name.clone());

            if self.apply {
                let mapping = apply_mount(env, remote, &config, &buckets_root, &bucket).await?;
                mounted.push(mapping);
            }
        }

        Ok(MountReport::Buckets { matched, mounted })
    }
}

/// Print the current mappings as a JSON object keyed by directory.
async fn list_existing_mounts<W>(env: &MountEnv<'_>, out: &mut W) -> Result<MountReport, MountError>
where
    W: Write + Send,
{
    let mappings = env
        .mappings
        .list_mount_mappings()
        .await
        .map_err(MountError::ListMounts)?;

    let by_dir: BTreeMap<&str, _> = mappings
        .iter()
        .map(|mapping| (mapping.dir.as_str(), &mapping.location))
        .collect();
    serde_json::to_writer_pretty(&mut *out, &by_dir).map_err(std::io::Error::from)?;
    writeln!(out)?;

    Ok(MountReport::Existing(mappings))
}
