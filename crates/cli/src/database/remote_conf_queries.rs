use sqlx::Row;

use common::remote::RemoteStorageConfig;

use crate::database::{now_ts, Database};

fn decode_config(raw: &str) -> Result<RemoteStorageConfig, sqlx::Error> {
    serde_json::from_str(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

impl Database {
    /// Save a remote storage configuration, replacing one with the same name.
    pub async fn upsert_remote_storage_config(
        &self,
        config: &RemoteStorageConfig,
    ) -> Result<(), sqlx::Error> {
        let raw = serde_json::to_string(config).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let now = now_ts();

        sqlx::query(
            r#"
            INSERT INTO remote_storage_configs (name, provider_type, config, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(name) DO UPDATE SET
                provider_type = excluded.provider_type,
                config = excluded.config,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&config.name)
        .bind(config.provider.type_name())
        .bind(raw)
        .bind(now)
        .bind(now)
        .execute(&**self)
        .await?;

        Ok(())
    }

    pub async fn get_remote_storage_config(
        &self,
        name: &str,
    ) -> Result<Option<RemoteStorageConfig>, sqlx::Error> {
        let row = sqlx::query("SELECT config FROM remote_storage_configs WHERE name = ?1")
            .bind(name)
            .fetch_optional(&**self)
            .await?;

        row.map(|r| decode_config(&r.get::<String, _>("config")))
            .transpose()
    }

    /// All configurations, ordered by name.
    pub async fn list_remote_storage_configs(
        &self,
    ) -> Result<Vec<RemoteStorageConfig>, sqlx::Error> {
        let rows = sqlx::query("SELECT config FROM remote_storage_configs ORDER BY name")
            .fetch_all(&**self)
            .await?;

        rows.iter()
            .map(|r| decode_config(&r.get::<String, _>("config")))
            .collect()
    }

    /// Returns whether a configuration was removed.
    pub async fn delete_remote_storage_config(&self, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM remote_storage_configs WHERE name = ?1")
            .bind(name)
            .execute(&**self)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
