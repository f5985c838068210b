use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use common::path::FullPath;
use common::remote::{RemoteObject, RemoteStorageLocation};

use crate::database::{now_ts, Database};

/// One node of the filer namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilerEntry {
    pub full_path: FullPath,
    pub is_directory: bool,
    pub size: u64,
    pub mtime: DateTime<Utc>,
    pub etag: Option<String>,
    /// Object key inside the remote bucket, for entries pulled from one
    pub remote_key: Option<String>,
}

/// What an upsert did to the stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChange {
    Created,
    Updated,
    Unchanged,
}

fn parent_of(path: &FullPath) -> String {
    path.parent().map(|p| p.to_string()).unwrap_or_default()
}

fn entry_from_row(r: &SqliteRow) -> FilerEntry {
    FilerEntry {
        full_path: FullPath::new(r.get::<String, _>("full_path")),
        is_directory: r.get::<i64, _>("is_directory") != 0,
        size: r.get::<i64, _>("size").max(0) as u64,
        mtime: DateTime::from_timestamp(r.get::<i64, _>("mtime"), 0).unwrap_or_default(),
        etag: r.get("etag"),
        remote_key: r.get("remote_key"),
    }
}

impl Database {
    /// Create a directory entry unless something already lives at `path`.
    ///
    /// Returns whether an entry was created.
    pub async fn ensure_directory(&self, path: &FullPath) -> Result<bool, sqlx::Error> {
        let now = now_ts();

        let result = sqlx::query(
            r#"
            INSERT INTO filer_entries (full_path, parent, name, is_directory, size, mtime, created_at, updated_at)
            VALUES (?1, ?2, ?3, 1, 0, ?4, ?5, ?6)
            ON CONFLICT(full_path) DO NOTHING
            "#,
        )
        .bind(path.as_str())
        .bind(parent_of(path))
        .bind(path.name())
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(&**self)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store the metadata of a remote object at `path`.
    ///
    /// An entry whose size, mtime and etag already match is left untouched.
    pub async fn upsert_remote_file(
        &self,
        path: &FullPath,
        object: &RemoteObject,
        location: &RemoteStorageLocation,
        remote_key: &str,
    ) -> Result<EntryChange, sqlx::Error> {
        let size = object.size as i64;
        let mtime = object.last_modified.timestamp();
        let now = now_ts();

        let existing = sqlx::query(
            r#"
            SELECT is_directory, size, mtime, etag
            FROM filer_entries
            WHERE full_path = ?1
            "#,
        )
        .bind(path.as_str())
        .fetch_optional(&**self)
        .await?;

        if let Some(row) = existing {
            let unchanged = row.get::<i64, _>("is_directory") == 0
                && row.get::<i64, _>("size") == size
                && row.get::<i64, _>("mtime") == mtime
                && row.get::<Option<String>, _>("etag") == object.etag;
            if unchanged {
                return Ok(EntryChange::Unchanged);
            }

            sqlx::query(
                r#"
                UPDATE filer_entries SET
                    is_directory = 0,
                    size = ?2,
                    mtime = ?3,
                    etag = ?4,
                    remote_name = ?5,
                    remote_bucket = ?6,
                    remote_key = ?7,
                    updated_at = ?8
                WHERE full_path = ?1
                "#,
            )
            .bind(path.as_str())
            .bind(size)
            .bind(mtime)
            .bind(&object.etag)
            .bind(&location.name)
            .bind(&location.bucket)
            .bind(remote_key)
            .bind(now)
            .execute(&**self)
            .await?;

            return Ok(EntryChange::Updated);
        }

        sqlx::query(
            r#"
            INSERT INTO filer_entries (
                full_path, parent, name, is_directory, size, mtime, etag,
                remote_name, remote_bucket, remote_key, created_at, updated_at
            ) VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(path.as_str())
        .bind(parent_of(path))
        .bind(path.name())
        .bind(size)
        .bind(mtime)
        .bind(&object.etag)
        .bind(&location.name)
        .bind(&location.bucket)
        .bind(remote_key)
        .bind(now)
        .bind(now)
        .execute(&**self)
        .await?;

        Ok(EntryChange::Created)
    }

    pub async fn get_entry(&self, path: &FullPath) -> Result<Option<FilerEntry>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT full_path, is_directory, size, mtime, etag, remote_key
            FROM filer_entries
            WHERE full_path = ?1
            "#,
        )
        .bind(path.as_str())
        .fetch_optional(&**self)
        .await?;

        Ok(row.as_ref().map(entry_from_row))
    }

    /// Direct children of `dir`, ordered by name.
    pub async fn list_children(&self, dir: &FullPath) -> Result<Vec<FilerEntry>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT full_path, is_directory, size, mtime, etag, remote_key
            FROM filer_entries
            WHERE parent = ?1
            ORDER BY name
            "#,
        )
        .bind(dir.as_str())
        .fetch_all(&**self)
        .await?;

        Ok(rows.iter().map(entry_from_row).collect())
    }

    pub async fn has_children(&self, dir: &FullPath) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM filer_entries WHERE parent = ?1) AS found",
        )
        .bind(dir.as_str())
        .fetch_one(&**self)
        .await?;

        Ok(row.get::<i64, _>("found") != 0)
    }
}
