use sqlx::Row;

use common::path::FullPath;
use common::remote::{MountMapping, RemoteStorageLocation};

use crate::database::{now_ts, Database};

impl Database {
    /// Record `dir` as mounted on `location`.
    ///
    /// A directory maps to at most one location; mounting it again replaces
    /// the old target.
    pub async fn upsert_mount_mapping(
        &self,
        dir: &FullPath,
        location: &RemoteStorageLocation,
    ) -> Result<(), sqlx::Error> {
        let now = now_ts();

        sqlx::query(
            r#"
            INSERT INTO mount_mappings (dir, remote_name, bucket, path, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(dir) DO UPDATE SET
                remote_name = excluded.remote_name,
                bucket = excluded.bucket,
                path = excluded.path,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(dir.as_str())
        .bind(&location.name)
        .bind(&location.bucket)
        .bind(&location.path)
        .bind(now)
        .bind(now)
        .execute(&**self)
        .await?;

        Ok(())
    }

    /// Every mapping, ordered by directory.
    pub async fn list_mount_mappings(&self) -> Result<Vec<MountMapping>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT dir, remote_name, bucket, path
            FROM mount_mappings
            ORDER BY dir
            "#,
        )
        .fetch_all(&**self)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| MountMapping {
                dir: FullPath::new(r.get::<String, _>("dir")),
                location: RemoteStorageLocation {
                    name: r.get("remote_name"),
                    bucket: r.get("bucket"),
                    path: r.get("path"),
                },
            })
            .collect())
    }
}
