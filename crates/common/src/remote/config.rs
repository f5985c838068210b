use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A named remote storage endpoint.
///
/// The name is the unique key under which the configuration is registered
/// in the filer; everything else depends on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStorageConfig {
    pub name: String,
    #[serde(flatten)]
    pub provider: RemoteProvider,
}

/// Provider specific connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteProvider {
    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// Custom endpoint URL (e.g., "http://localhost:9000" for MinIO),
        /// AWS when unset
        #[serde(default)]
        endpoint: Option<String>,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Optional region (defaults to "us-east-1")
        #[serde(default)]
        region: Option<String>,
    },

    /// A local directory: every sub-directory is a bucket, every file
    /// below it an object
    Local {
        /// Path to the directory holding the buckets
        path: PathBuf,
    },
}

impl RemoteProvider {
    pub fn type_name(&self) -> &'static str {
        match self {
            RemoteProvider::S3 { .. } => "s3",
            RemoteProvider::Local { .. } => "local",
        }
    }
}

impl RemoteStorageConfig {
    pub fn new(name: impl Into<String>, provider: RemoteProvider) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    /// A copy safe to print: secrets are masked.
    pub fn redacted(&self) -> Self {
        let provider = match &self.provider {
            RemoteProvider::S3 {
                endpoint,
                access_key,
                region,
                ..
            } => RemoteProvider::S3 {
                endpoint: endpoint.clone(),
                access_key: access_key.clone(),
                secret_key: "****".to_string(),
                region: region.clone(),
            },
            other => other.clone(),
        };
        Self {
            name: self.name.clone(),
            provider,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigStoreError {
    #[error("remote storage '{0}' is not configured")]
    NotFound(String),
    #[error("configuration store unavailable: {0}")]
    BackendUnavailable(String),
}

/// Read access to the registered remote storage configurations.
#[async_trait::async_trait]
pub trait RemoteConfigStore: Send + Sync {
    async fn read_remote_storage_config(
        &self,
        name: &str,
    ) -> Result<RemoteStorageConfig, ConfigStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_is_tagged_by_type() {
        let config = RemoteStorageConfig::new(
            "cloud1",
            RemoteProvider::S3 {
                endpoint: Some("http://localhost:9000".to_string()),
                access_key: "xxx".to_string(),
                secret_key: "yyy".to_string(),
                region: None,
            },
        );

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["name"], "cloud1");
        assert_eq!(json["type"], "s3");
        assert_eq!(json["access_key"], "xxx");

        let parsed: RemoteStorageConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_redacted_masks_secret_only() {
        let config = RemoteStorageConfig::new(
            "cloud1",
            RemoteProvider::S3 {
                endpoint: None,
                access_key: "xxx".to_string(),
                secret_key: "yyy".to_string(),
                region: Some("eu-west-1".to_string()),
            },
        );

        match config.redacted().provider {
            RemoteProvider::S3 {
                access_key,
                secret_key,
                region,
                ..
            } => {
                assert_eq!(access_key, "xxx");
                assert_eq!(secret_key, "****");
                assert_eq!(region.as_deref(), Some("eu-west-1"));
            }
            other => panic!("unexpected provider {:?}", other),
        }
    }
}
