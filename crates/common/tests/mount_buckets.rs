//! Mount run behavior against the recording test environment.

use common::mount::{MountBuckets, MountError, MountReport};
use common::path::FullPath;
use common::remote::RemoteStorageLocation;
use common::testkit::{Call, TestEnv};

const BUCKETS: &[&str] = &["logs-2023", "logs-2024", "media"];

fn mount(remote: &str, pattern: &str, apply: bool) -> MountBuckets {
    MountBuckets {
        remote: remote.to_string(),
        bucket_pattern: pattern.to_string(),
        apply,
    }
}

fn sync_call(bucket: &str) -> Call {
    Call::SyncMetadata {
        dir: FullPath::from("/buckets").child(bucket),
        location: RemoteStorageLocation::bucket_root("cloud1", bucket),
    }
}

fn insert_call(bucket: &str) -> Call {
    Call::InsertMountMapping {
        dir: FullPath::from("/buckets").child(bucket),
        location: RemoteStorageLocation::bucket_root("cloud1", bucket),
    }
}

#[tokio::test]
async fn test_dry_run_reports_matches_without_side_effects() {
    let env = TestEnv::new("/buckets").with_remote("cloud1", BUCKETS);
    let mut out = Vec::new();

    let report = mount("cloud1", "logs-*", false)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "bucket logs-2023\nbucket logs-2024\n"
    );
    assert_eq!(
        report,
        MountReport::Buckets {
            matched: vec!["logs-2023".to_string(), "logs-2024".to_string()],
            mounted: vec![],
        }
    );
    assert_eq!(
        env.calls(),
        vec![
            Call::ReadConfig("cloud1".to_string()),
            Call::Connect("cloud1".to_string()),
            Call::ListBuckets("cloud1".to_string()),
            Call::BucketsRoot,
        ]
    );
    assert!(env.mappings().is_empty());
}

#[tokio::test]
async fn test_apply_pulls_before_each_mapping() {
    let env = TestEnv::new("/buckets").with_remote("cloud1", BUCKETS);
    let mut out = Vec::new();

    let report = mount("cloud1", "", true)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap();

    let side_effects: Vec<Call> = env
        .calls()
        .into_iter()
        .filter(|call| {
            matches!(
                call,
                Call::SyncMetadata { .. } | Call::InsertMountMapping { .. }
            )
        })
        .collect();
    assert_eq!(
        side_effects,
        vec![
            sync_call("logs-2023"),
            insert_call("logs-2023"),
            sync_call("logs-2024"),
            insert_call("logs-2024"),
            sync_call("media"),
            insert_call("media"),
        ]
    );

    let dirs: Vec<String> = env.mappings().iter().map(|m| m.dir.to_string()).collect();
    assert_eq!(
        dirs,
        vec!["/buckets/logs-2023", "/buckets/logs-2024", "/buckets/media"]
    );

    match report {
        MountReport::Buckets { matched, mounted } => {
            assert_eq!(matched.len(), 3);
            assert_eq!(mounted.len(), 3);
            assert_eq!(mounted[2].location.path, "/");
        }
        other => panic!("unexpected report {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_remote_lists_existing_mounts_only() {
    let env = TestEnv::new("/buckets").with_remote("cloud1", BUCKETS);
    env.seed_mapping("/buckets/media", "cloud1", "media");
    let mut out = Vec::new();

    let report = mount("", "logs-*", true)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap();

    assert_eq!(env.calls(), vec![Call::ListMountMappings]);
    match report {
        MountReport::Existing(mappings) => {
            assert_eq!(mappings.len(), 1);
            assert_eq!(mappings[0].dir.as_str(), "/buckets/media");
        }
        other => panic!("unexpected report {:?}", other),
    }
    assert!(String::from_utf8(out).unwrap().contains("\"/buckets/media\""));
}

#[tokio::test]
async fn test_reapply_is_idempotent_and_pulls_again() {
    let env = TestEnv::new("/buckets").with_remote("cloud1", &["media"]);

    for _ in 0..2 {
        let mut out = Vec::new();
        mount("cloud1", "", true)
            .run(&env.mount_env(), &mut out)
            .await
            .unwrap();
    }

    let pulls = env
        .calls()
        .into_iter()
        .filter(|call| *call == sync_call("media"))
        .count();
    assert_eq!(pulls, 2);
    assert_eq!(env.mappings().len(), 1);
}

#[tokio::test]
async fn test_pull_failure_stops_the_run() {
    let env = TestEnv::new("/buckets")
        .with_remote("cloud1", BUCKETS)
        .fail_sync("logs-2024");
    let mut out = Vec::new();

    let err = mount("cloud1", "", true)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MountError::Sync { .. }));
    assert!(err
        .to_string()
        .starts_with("pull metadata on cloud1/logs-2024/"));

    // earlier bucket fully applied, failed bucket has no mapping, later never touched
    let calls = env.calls();
    assert!(calls.contains(&sync_call("logs-2023")));
    assert!(calls.contains(&insert_call("logs-2023")));
    assert!(calls.contains(&sync_call("logs-2024")));
    assert!(!calls.contains(&insert_call("logs-2024")));
    assert!(!calls.contains(&sync_call("media")));

    let dirs: Vec<String> = env.mappings().iter().map(|m| m.dir.to_string()).collect();
    assert_eq!(dirs, vec!["/buckets/logs-2023"]);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "bucket logs-2023\nbucket logs-2024\n"
    );
}

#[tokio::test]
async fn test_persist_failure_names_dir_and_location() {
    let env = TestEnv::new("/buckets")
        .with_remote("cloud1", BUCKETS)
        .fail_persist("logs-2023");
    let mut out = Vec::new();

    let err = mount("cloud1", "", true)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MountError::Persist { .. }));
    assert!(err
        .to_string()
        .starts_with("save mount mapping /buckets/logs-2023 to cloud1/logs-2023/"));
    assert!(!env.calls().contains(&sync_call("logs-2024")));
    assert!(env.mappings().is_empty());
}

#[tokio::test]
async fn test_listing_failure_is_fatal_before_any_output() {
    let env = TestEnv::new("/buckets")
        .with_remote("cloud1", BUCKETS)
        .fail_listing("cloud1");
    let mut out = Vec::new();

    let err = mount("cloud1", "", true)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MountError::ListBuckets { .. }));
    assert!(err.to_string().starts_with("list buckets on cloud1"));
    assert!(out.is_empty());
    assert!(!env.calls().contains(&Call::BucketsRoot));
}

#[tokio::test]
async fn test_buckets_root_failure_is_fatal() {
    let env = TestEnv::new("/buckets")
        .with_remote("cloud1", BUCKETS)
        .buckets_root_unavailable();
    let mut out = Vec::new();

    let err = mount("cloud1", "", false)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MountError::BucketsRoot(_)));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_malformed_pattern_mounts_nothing() {
    let env = TestEnv::new("/buckets").with_remote("cloud1", BUCKETS);
    let mut out = Vec::new();

    let report = mount("cloud1", "logs-[", true)
        .run(&env.mount_env(), &mut out)
        .await
        .unwrap();

    assert!(out.is_empty());
    assert_eq!(
        report,
        MountReport::Buckets {
            matched: vec![],
            mounted: vec![],
        }
    );
    assert!(env.mappings().is_empty());
}
