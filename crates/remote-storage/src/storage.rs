//! Object listings over `object_store` backends (S3/MinIO/local filesystem/memory).

use std::path::Path;
use std::sync::Arc;

use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};

use common::remote::{RemoteObject, RemoteStorageError, RemoteStorageLocation};

use crate::error::from_object_store;

/// Settings for reaching one S3 bucket.
#[derive(Debug, Clone)]
pub(crate) struct S3BucketConfig<'a> {
    pub endpoint: Option<&'a str>,
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    pub bucket: &'a str,
}

/// One bucket, behind whichever object store backend holds it.
#[derive(Debug, Clone)]
pub(crate) struct Storage {
    inner: Arc<dyn ObjectStore>,
    bucket: String,
}

impl Storage {
    /// Storage for an S3-compatible bucket.
    pub fn s3(config: S3BucketConfig<'_>) -> Result<Self, RemoteStorageError> {
        let mut builder = AmazonS3Builder::new()
            .with_access_key_id(config.access_key)
            .with_secret_access_key(config.secret_key)
            .with_bucket_name(config.bucket)
            .with_region(config.region);
        if let Some(endpoint) = config.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| RemoteStorageError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            bucket: config.bucket.to_string(),
        })
    }

    /// Storage for a bucket that is a directory on the local filesystem.
    pub fn local(dir: &Path, bucket: &str) -> Result<Self, RemoteStorageError> {
        if !dir.is_dir() {
            return Err(RemoteStorageError::BucketNotFound(bucket.to_string()));
        }
        let store = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| RemoteStorageError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            bucket: bucket.to_string(),
        })
    }

    /// Every object below `location`, sorted by key.
    ///
    /// Keys are returned relative to the location's path.
    pub async fn list_objects(
        &self,
        location: &RemoteStorageLocation,
    ) -> Result<Vec<RemoteObject>, RemoteStorageError> {
        let prefix = location.key_prefix().trim_end_matches('/');
        let prefix_path = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));

        let metas: Vec<ObjectMeta> = self
            .inner
            .list(prefix_path.as_ref())
            .try_collect()
            .await
            .map_err(|e| from_object_store(e, &self.bucket))?;

        let mut objects: Vec<RemoteObject> = metas
            .into_iter()
            .filter_map(|meta| to_remote_object(meta, prefix))
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            count = objects.len(),
            "listed remote objects"
        );
        Ok(objects)
    }
}

fn to_remote_object(meta: ObjectMeta, prefix: &str) -> Option<RemoteObject> {
    let full_key = meta.location.as_ref();
    let key = if prefix.is_empty() {
        full_key
    } else {
        full_key.strip_prefix(prefix)?.strip_prefix('/')?
    };
    if key.is_empty() {
        return None;
    }

    Some(RemoteObject {
        key: key.to_string(),
        size: meta.size as u64,
        last_modified: meta.last_modified,
        etag: meta.e_tag,
    })
}

#[cfg(test)]
impl Storage {
    /// Create an in-memory storage backend (test-only).
    pub fn memory(bucket: &str) -> Self {
        Self {
            inner: Arc::new(object_store::memory::InMemory::new()),
            bucket: bucket.to_string(),
        }
    }

    pub async fn put(&self, key: &str, data: &'static str) {
        self.inner
            .put(&ObjectPath::from(key), data.into())
            .await
            .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(objects: &[RemoteObject]) -> Vec<&str> {
        objects.iter().map(|o| o.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_whole_bucket() {
        let storage = Storage::memory("media");
        storage.put("readme.txt", "hello").await;
        storage.put("photos/a.jpg", "aaaa").await;
        storage.put("photos/2024/b.jpg", "bb").await;

        let objects = storage
            .list_objects(&RemoteStorageLocation::bucket_root("cloud1", "media"))
            .await
            .unwrap();

        assert_eq!(
            keys(&objects),
            vec!["photos/2024/b.jpg", "photos/a.jpg", "readme.txt"]
        );
        assert_eq!(objects[2].size, 5);
    }

    #[tokio::test]
    async fn test_list_below_prefix_is_relative() {
        let storage = Storage::memory("media");
        storage.put("readme.txt", "hello").await;
        storage.put("photos/a.jpg", "aaaa").await;
        storage.put("photos/2024/b.jpg", "bb").await;
        storage.put("photosets/c.jpg", "c").await;

        let location = RemoteStorageLocation {
            name: "cloud1".to_string(),
            bucket: "media".to_string(),
            path: "/photos/".to_string(),
        };
        let objects = storage.list_objects(&location).await.unwrap();

        assert_eq!(keys(&objects), vec!["2024/b.jpg", "a.jpg"]);
    }

    #[tokio::test]
    async fn test_local_missing_bucket_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Storage::local(&temp_dir.path().join("nope"), "nope").unwrap_err();
        assert!(matches!(err, RemoteStorageError::BucketNotFound(ref b) if b == "nope"));
    }
}
