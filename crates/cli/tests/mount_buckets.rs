//! End to end bucket mounting against a local-directory remote and an
//! in-memory filer database.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use common::mount::{MountBuckets, MountEnv, MountError, MountReport};
use common::path::FullPath;
use common::remote::{RemoteProvider, RemoteStorageConfig};
use remote_storage::RemoteStorageRegistry;
use rmount_cli::{Database, SqliteFiler};

/// A remote root with three buckets and a stray file.
fn setup_remote() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    for (key, body) in [
        ("logs-2023/2023/01/app.log", "jan"),
        ("logs-2023/2023/02/app.log", "february"),
        ("logs-2024/2024/01/app.log", "jan"),
        ("media/index.html", "<html/>"),
    ] {
        let path = root.join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }
    std::fs::write(root.join("README"), "not a bucket").unwrap();
    temp_dir
}

async fn setup_filer(remote_root: &Path) -> (SqliteFiler, Arc<RemoteStorageRegistry>) {
    let db = Database::in_memory().await.unwrap();
    db.upsert_remote_storage_config(&RemoteStorageConfig::new(
        "archive",
        RemoteProvider::Local {
            path: remote_root.to_path_buf(),
        },
    ))
    .await
    .unwrap();

    let registry = Arc::new(RemoteStorageRegistry::new());
    let filer = SqliteFiler::new(db, FullPath::from("/buckets"), registry.clone());
    (filer, registry)
}

fn command(remote: &str, pattern: &str, apply: bool) -> MountBuckets {
    MountBuckets {
        remote: remote.to_string(),
        bucket_pattern: pattern.to_string(),
        apply,
    }
}

#[tokio::test]
async fn test_dry_run_reports_matches_only() {
    let remote = setup_remote();
    let (filer, registry) = setup_filer(remote.path()).await;
    let env = MountEnv::new(&filer, registry.as_ref(), &filer);

    let mut out = Vec::new();
    let report = command("archive", "logs-*", false)
        .run(&env, &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "bucket logs-2023\nbucket logs-2024\n"
    );
    assert!(matches!(report, MountReport::Buckets { ref mounted, .. } if mounted.is_empty()));

    let db = filer.database();
    assert!(db.list_mount_mappings().await.unwrap().is_empty());
    assert!(db.get_entry(&FullPath::from("/buckets")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_apply_mounts_and_pulls_every_bucket() {
    let remote = setup_remote();
    let (filer, registry) = setup_filer(remote.path()).await;
    let env = MountEnv::new(&filer, registry.as_ref(), &filer);

    let mut out = Vec::new();
    command("archive", "", true)
        .run(&env, &mut out)
        .await
        .unwrap();

    let db = filer.database();
    let mappings = db.list_mount_mappings().await.unwrap();
    let dirs: Vec<_> = mappings.iter().map(|m| m.dir.as_str()).collect();
    assert_eq!(
        dirs,
        vec!["/buckets/logs-2023", "/buckets/logs-2024", "/buckets/media"]
    );
    for mapping in &mappings {
        assert_eq!(mapping.location.name, "archive");
        assert_eq!(mapping.location.bucket, mapping.dir.name());
        assert_eq!(mapping.location.path, "/");
    }

    let log = db
        .get_entry(&FullPath::from("/buckets/logs-2023/2023/02/app.log"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(log.size, 8);
    assert_eq!(log.remote_key.as_deref(), Some("2023/02/app.log"));

    let children: Vec<_> = db
        .list_children(&FullPath::from("/buckets"))
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.full_path.name().to_string())
        .collect();
    assert_eq!(children, vec!["logs-2023", "logs-2024", "media"]);
}

#[tokio::test]
async fn test_reapply_is_idempotent() {
    let remote = setup_remote();
    let (filer, registry) = setup_filer(remote.path()).await;
    let env = MountEnv::new(&filer, registry.as_ref(), &filer);

    for _ in 0..2 {
        command("archive", "media", true)
            .run(&env, &mut Vec::new())
            .await
            .unwrap();
    }

    let db = filer.database();
    assert_eq!(db.list_mount_mappings().await.unwrap().len(), 1);
    let entries = db
        .list_children(&FullPath::from("/buckets/media"))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].full_path.as_str(), "/buckets/media/index.html");
}

#[tokio::test]
async fn test_status_prints_mappings_as_json() {
    let remote = setup_remote();
    let (filer, registry) = setup_filer(remote.path()).await;
    let env = MountEnv::new(&filer, registry.as_ref(), &filer);

    command("archive", "logs-2024", true)
        .run(&env, &mut Vec::new())
        .await
        .unwrap();

    let mut out = Vec::new();
    let report = command("", "", false).run(&env, &mut out).await.unwrap();
    assert!(matches!(report, MountReport::Existing(ref m) if m.len() == 1));

    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed["/buckets/logs-2024"]["name"], "archive");
    assert_eq!(printed["/buckets/logs-2024"]["bucket"], "logs-2024");
}

#[tokio::test]
async fn test_unknown_remote() {
    let remote = setup_remote();
    let (filer, registry) = setup_filer(remote.path()).await;
    let env = MountEnv::new(&filer, registry.as_ref(), &filer);

    let err = command("cloud9", "", true)
        .run(&env, &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MountError::Config { .. }));
    assert_eq!(
        err.to_string(),
        "find configuration for cloud9: remote storage 'cloud9' is not configured"
    );
}

#[tokio::test]
async fn test_vanished_remote_root_fails_listing() {
    let remote = setup_remote();
    let (filer, registry) = setup_filer(&remote.path().join("gone")).await;
    let env = MountEnv::new(&filer, registry.as_ref(), &filer);

    let mut out = Vec::new();
    let err = command("archive", "", true)
        .run(&env, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, MountError::ListBuckets { .. }));
    assert!(out.is_empty());
    assert!(filer.database().list_mount_mappings().await.unwrap().is_empty());
}
