//! Remote object storage as seen by the mount orchestrator.
//!
//! - **[`RemoteStorageConfig`]**: a named endpoint plus provider specific settings
//! - **[`RemoteStorageClient`]**: lists buckets and objects at one endpoint
//! - **[`RemoteStorageConnector`]**: turns a configuration into a client
//! - **[`RemoteConfigStore`]**: resolves a storage name into its configuration
//! - **[`RemoteStorageLocation`]** / **[`MountMapping`]**: where a filer
//!   directory points to on the remote side

mod client;
mod config;
mod location;

pub use client::{
    RemoteBucket, RemoteObject, RemoteStorageClient, RemoteStorageConnector, RemoteStorageError,
};
pub use config::{ConfigStoreError, RemoteConfigStore, RemoteProvider, RemoteStorageConfig};
pub use location::{MountMapping, RemoteStorageLocation};
