/// In-memory collaborators for mount runs
///
/// [`TestEnv`] plays every role a [`MountEnv`](crate::mount::MountEnv) needs:
/// config store, remote connector, buckets root, metadata pull and mapping
/// store. Every call is recorded in order so tests can assert on what was
/// (and was not) touched.
///
/// # Example
///
/// ```rust,ignore
/// use common::mount::MountBuckets;
/// use common::testkit::{Call, TestEnv};
///
/// #[tokio::test]
/// async fn test_dry_run() {
///     let env = TestEnv::new("/buckets").with_remote("cloud1", &["media"]);
///     let mut out = Vec::new();
///
///     MountBuckets { remote: "cloud1".into(), ..Default::default() }
///         .run(&env.mount_env(), &mut out)
///         .await
///         .unwrap();
///
///     assert_eq!(String::from_utf8(out).unwrap(), "bucket media\n");
/// }
/// ```
mod env;

pub use env::{Call, TestEnv};
