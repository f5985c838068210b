//! S3-compatible remote storage.
//!
//! Buckets are listed with the AWS SDK's ListBuckets paginator; object
//! listing goes through `object_store`'s S3 backend.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use url::Url;

use common::remote::{
    RemoteBucket, RemoteObject, RemoteProvider, RemoteStorageClient, RemoteStorageConfig,
    RemoteStorageError, RemoteStorageLocation,
};

use crate::error::from_sdk;
use crate::storage::{S3BucketConfig, Storage};

const DEFAULT_REGION: &str = "us-east-1";

/// Client for one S3-compatible endpoint.
#[derive(Debug)]
pub struct S3Client {
    client: Client,
    /// Custom endpoint (MinIO, Ceph, ...); `None` means AWS for the region
    endpoint: Option<String>,
    access_key: String,
    secret_key: String,
    region: String,
}

impl S3Client {
    /// Build a client from an `s3` configuration.
    ///
    /// Nothing is sent over the network until a listing is requested. A
    /// custom endpoint is addressed path-style and keeps its own path, so
    /// `http://host/minio` lists buckets at `/minio/`.
    pub async fn new(config: &RemoteStorageConfig) -> Result<Self, RemoteStorageError> {
        let RemoteProvider::S3 {
            endpoint,
            access_key,
            secret_key,
            region,
        } = &config.provider
        else {
            return Err(RemoteStorageError::InvalidConfig(format!(
                "{} is a {} storage, not s3",
                config.name,
                config.provider.type_name()
            )));
        };

        if let Some(endpoint) = endpoint {
            Url::parse(endpoint).map_err(|e| {
                RemoteStorageError::InvalidConfig(format!("endpoint {}: {}", endpoint, e))
            })?;
        }

        let region = region.as_deref().unwrap_or(DEFAULT_REGION).to_string();
        let credentials = Credentials::new(
            access_key.clone(),
            secret_key.clone(),
            None,
            None,
            "rmount",
        );
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(s3_config.build()),
            endpoint: endpoint.clone(),
            access_key: access_key.clone(),
            secret_key: secret_key.clone(),
            region,
        })
    }
}

#[async_trait::async_trait]
impl RemoteStorageClient for S3Client {
    async fn list_buckets(&self) -> Result<Vec<RemoteBucket>, RemoteStorageError> {
        let mut pages = self.client.list_buckets().into_paginator().send();

        let mut buckets = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(from_sdk)?;
            buckets.extend(page.buckets().iter().filter_map(|bucket| {
                let name = bucket.name()?;
                let created_at = bucket.creation_date().and_then(|date| {
                    DateTime::<Utc>::from_timestamp(date.secs(), date.subsec_nanos())
                });
                Some(RemoteBucket {
                    name: name.to_string(),
                    created_at,
                })
            }));
        }

        tracing::debug!(
            endpoint = self.endpoint.as_deref().unwrap_or("aws"),
            region = %self.region,
            count = buckets.len(),
            "listed s3 buckets"
        );
        Ok(buckets)
    }

    async fn list_objects(
        &self,
        location: &RemoteStorageLocation,
    ) -> Result<Vec<RemoteObject>, RemoteStorageError> {
        let storage = Storage::s3(S3BucketConfig {
            endpoint: self.endpoint.as_deref(),
            access_key: &self.access_key,
            secret_key: &self.secret_key,
            region: &self.region,
            bucket: &location.bucket,
        })?;
        storage.list_objects(location).await
    }
}
