use common::remote::{
    RemoteProvider, RemoteStorageClient, RemoteStorageConfig, RemoteStorageConnector,
    RemoteStorageError,
};

use crate::{LocalClient, S3Client};

/// Hands out the client matching a configuration's provider.
///
/// Built once at startup and passed to whoever needs to connect.
#[derive(Debug, Clone, Default)]
pub struct RemoteStorageRegistry;

impl RemoteStorageRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Provider type names this registry can connect to.
    pub fn providers(&self) -> &'static [&'static str] {
        &["s3", "local"]
    }
}

#[async_trait::async_trait]
impl RemoteStorageConnector for RemoteStorageRegistry {
    async fn connect(
        &self,
        config: &RemoteStorageConfig,
    ) -> Result<Box<dyn RemoteStorageClient>, RemoteStorageError> {
        tracing::debug!(
            remote = %config.name,
            provider = config.provider.type_name(),
            "connecting to remote storage"
        );
        let client: Box<dyn RemoteStorageClient> = match &config.provider {
            RemoteProvider::S3 { .. } => Box::new(S3Client::new(config).await?),
            RemoteProvider::Local { .. } => Box::new(LocalClient::new(config)?),
        };
        Ok(client)
    }
}
