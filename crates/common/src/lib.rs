/**
 * Filer-side paths.
 *  Slash separated, independent of the host OS.
 */
pub mod path;
/**
 * Remote storage vocabulary: named configurations,
 *  buckets, locations inside buckets, and the
 *  client / config store interfaces that reach them.
 */
pub mod remote;
/**
 * Interfaces onto the filer: where buckets live,
 *  pulling remote metadata into the namespace, and
 *  durable mount mappings.
 */
pub mod filer;
/**
 * Discovering, filtering and mounting remote
 *  buckets under the filer buckets root.
 */
pub mod mount;
/**
 * In-memory collaborators that record every call,
 *  for exercising the orchestrator without a filer
 *  or a real remote.
 */
pub mod testkit;

pub mod prelude {
    pub use crate::filer::{FilerConfig, FilerError, MetadataSync, MountMappingStore};
    pub use crate::mount::{MountBuckets, MountEnv, MountError, MountReport};
    pub use crate::path::FullPath;
    pub use crate::remote::{
        MountMapping, RemoteBucket, RemoteConfigStore, RemoteObject, RemoteProvider,
        RemoteStorageClient, RemoteStorageConfig, RemoteStorageConnector, RemoteStorageError,
        RemoteStorageLocation,
    };
}
