//! Mounting remote buckets into the filer.
//!
//! A run of [`MountBuckets`] goes through these steps, one at a time:
//!
//! ```text
//! resolve config -> list buckets -> resolve buckets root
//!        |
//!        +-- for each bucket, in listing order
//!              filter -> report "bucket <name>" -> (apply) pull metadata -> save mapping
//! ```
//!
//! - **[`filter_buckets`]**: shell style wildcard selection of bucket names
//! - **[`mount_target`]**: where a bucket lands under the buckets root
//! - **[`apply_mount`]**: pull then persist for a single bucket
//! - **[`MountBuckets`]**: the whole run, dry or applied
//!
//! Metadata is pulled before the mapping is saved, so a directory that has a
//! mapping also has its entries. The first failure ends the run; buckets
//! mounted before it stay mounted.

mod apply;
mod buckets;
mod error;
mod filter;
mod target;

pub use apply::apply_mount;
pub use buckets::{MountBuckets, MountEnv, MountReport};
pub use error::MountError;
pub use filter::{filter_buckets, BucketPattern};
pub use target::mount_target;
