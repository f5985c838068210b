//! Remote Storage Clients
//!
//! This crate provides the [`RemoteStorageClient`](common::remote::RemoteStorageClient)
//! implementations rmount mounts buckets from, one per provider:
//!
//! - S3-compatible storage (AWS S3, MinIO, ...): buckets are listed with
//!   `aws-sdk-s3`, objects through `object_store`
//! - Local directories: sub-directories are buckets, files are objects
//!
//! [`RemoteStorageRegistry`] picks the client matching a configuration's
//! provider.
//!
//! # Example
//!
//! ```rust,no_run
//! use common::remote::{RemoteProvider, RemoteStorageConfig, RemoteStorageConnector};
//! use remote_storage::RemoteStorageRegistry;
//!
//! # async fn example() -> Result<(), common::remote::RemoteStorageError> {
//! let config = RemoteStorageConfig::new(
//!     "archive",
//!     RemoteProvider::Local { path: "/srv/archive".into() },
//! );
//! let client = RemoteStorageRegistry::new().connect(&config).await?;
//! for bucket in client.list_buckets().await? {
//!     println!("{}", bucket.name);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod local;
mod registry;
mod s3;
mod storage;

pub use local::LocalClient;
pub use registry::RemoteStorageRegistry;
pub use s3::S3Client;
