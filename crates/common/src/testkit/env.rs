use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::filer::{FilerConfig, FilerError, MetadataSync, MountMappingStore};
use crate::mount::MountEnv;
use crate::path::FullPath;
use crate::remote::{
    ConfigStoreError, MountMapping, RemoteBucket, RemoteConfigStore, RemoteObject,
    RemoteProvider, RemoteStorageClient, RemoteStorageConfig, RemoteStorageConnector,
    RemoteStorageError, RemoteStorageLocation,
};

/// A single collaborator call, as seen by [`TestEnv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ReadConfig(String),
    Connect(String),
    ListBuckets(String),
    BucketsRoot,
    SyncMetadata {
        dir: FullPath,
        location: RemoteStorageLocation,
    },
    InsertMountMapping {
        dir: FullPath,
        location: RemoteStorageLocation,
    },
    ListMountMappings,
}

#[derive(Debug, Default)]
struct Inner {
    configs: HashMap<String, RemoteStorageConfig>,
    buckets: HashMap<String, Vec<String>>,
    mappings: BTreeMap<FullPath, RemoteStorageLocation>,
    calls: Vec<Call>,
    fail_listing: HashSet<String>,
    fail_sync: HashSet<String>,
    fail_persist: HashSet<String>,
    buckets_root_unavailable: bool,
}

/// Recording fake for every mount collaborator.
#[derive(Debug, Clone)]
pub struct TestEnv {
    buckets_root: FullPath,
    inner: Arc<Mutex<Inner>>,
}

impl TestEnv {
    pub fn new(buckets_root: &str) -> Self {
        Self {
            buckets_root: FullPath::from(buckets_root),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Register a remote storage named `name` holding `buckets`, listed in
    /// the given order.
    pub fn with_remote(self, name: &str, buckets: &[&str]) -> Self {
        {
            let mut inner = self.inner.lock();
            let config = RemoteStorageConfig::new(
                name,
                RemoteProvider::Local {
                    path: PathBuf::from(format!("/remote/{}", name)),
                },
            );
            inner.configs.insert(name.to_string(), config);
            inner.buckets.insert(
                name.to_string(),
                buckets.iter().map(|b| b.to_string()).collect(),
            );
        }
        self
    }

    /// Make bucket listing on `remote` fail with a transport error.
    pub fn fail_listing(self, remote: &str) -> Self {
        self.inner.lock().fail_listing.insert(remote.to_string());
        self
    }

    /// Make the metadata pull of `bucket` fail.
    pub fn fail_sync(self, bucket: &str) -> Self {
        self.inner.lock().fail_sync.insert(bucket.to_string());
        self
    }

    /// Make saving the mapping for `bucket` fail.
    pub fn fail_persist(self, bucket: &str) -> Self {
        self.inner.lock().fail_persist.insert(bucket.to_string());
        self
    }

    pub fn buckets_root_unavailable(self) -> Self {
        self.inner.lock().buckets_root_unavailable = true;
        self
    }

    /// Put a mapping in place without recording a call.
    pub fn seed_mapping(&self, dir: &str, remote: &str, bucket: &str) {
        self.inner.lock().mappings.insert(
            FullPath::from(dir),
            RemoteStorageLocation::bucket_root(remote, bucket),
        );
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn mappings(&self) -> Vec<MountMapping> {
        self.inner
            .lock()
            .mappings
            .iter()
            .map(|(dir, location)| MountMapping {
                dir: dir.clone(),
                location: location.clone(),
            })
            .collect()
    }

    pub fn mount_env(&self) -> MountEnv<'_> {
        MountEnv::new(self, self, self)
    }

    fn record(&self, call: Call) {
        self.inner.lock().calls.push(call);
    }
}

#[async_trait::async_trait]
impl RemoteConfigStore for TestEnv {
    async fn read_remote_storage_config(
        &self,
        name: &str,
    ) -> Result<RemoteStorageConfig, ConfigStoreError> {
        self.record(Call::ReadConfig(name.to_string()));
        self.inner
            .lock()
            .configs
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigStoreError::NotFound(name.to_string()))
    }
}

#[async_trait::async_trait]
impl RemoteStorageConnector for TestEnv {
    async fn connect(
        &self,
        config: &RemoteStorageConfig,
    ) -> Result<Box<dyn RemoteStorageClient>, RemoteStorageError> {
        self.record(Call::Connect(config.name.clone()));
        Ok(Box::new(TestClient {
            env: self.clone(),
            remote: config.name.clone(),
        }))
    }
}

struct TestClient {
    env: TestEnv,
    remote: String,
}

#[async_trait::async_trait]
impl RemoteStorageClient for TestClient {
    async fn list_buckets(&self) -> Result<Vec<RemoteBucket>, RemoteStorageError> {
        self.env.record(Call::ListBuckets(self.remote.clone()));
        let inner = self.env.inner.lock();
        if inner.fail_listing.contains(&self.remote) {
            return Err(RemoteStorageError::Transport(format!(
                "connection to {} reset",
                self.remote
            )));
        }
        Ok(inner
            .buckets
            .get(&self.remote)
            .map(|names| names.iter().map(RemoteBucket::new).collect())
            .unwrap_or_default())
    }

    async fn list_objects(
        &self,
        _location: &RemoteStorageLocation,
    ) -> Result<Vec<RemoteObject>, RemoteStorageError> {
        Ok(Vec::new())
    }
}

#[async_trait::async_trait]
impl FilerConfig for TestEnv {
    async fn buckets_root(&self) -> Result<FullPath, FilerError> {
        self.record(Call::BucketsRoot);
        if self.inner.lock().buckets_root_unavailable {
            return Err(FilerError::msg("filer unreachable"));
        }
        Ok(self.buckets_root.clone())
    }
}

#[async_trait::async_trait]
impl MetadataSync for TestEnv {
    async fn sync_metadata(
        &self,
        target_dir: &FullPath,
        _is_mount: bool,
        _config: &RemoteStorageConfig,
        location: &RemoteStorageLocation,
    ) -> Result<(), FilerError> {
        self.record(Call::SyncMetadata {
            dir: target_dir.clone(),
            location: location.clone(),
        });
        if self.inner.lock().fail_sync.contains(&location.bucket) {
            return Err(FilerError::msg(format!("listing {} timed out", location.bucket)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MountMappingStore for TestEnv {
    async fn insert_mount_mapping(
        &self,
        dir: &FullPath,
        location: &RemoteStorageLocation,
    ) -> Result<(), FilerError> {
        self.record(Call::InsertMountMapping {
            dir: dir.clone(),
            location: location.clone(),
        });
        let mut inner = self.inner.lock();
        if inner.fail_persist.contains(&location.bucket) {
            return Err(FilerError::msg("mapping store is read-only"));
        }
        inner.mappings.insert(dir.clone(), location.clone());
        Ok(())
    }

    async fn list_mount_mappings(&self) -> Result<Vec<MountMapping>, FilerError> {
        self.record(Call::ListMountMappings);
        Ok(self.mappings())
    }
}
