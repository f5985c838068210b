//! Manage named remote storage configurations

use std::fmt;
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use common::remote::{RemoteProvider, RemoteStorageConfig};
use rmount_cli::{AppState, DatabaseSetupError, StateError};

use crate::cli::op::Op;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderType {
    /// S3 or an S3-compatible service (MinIO, Ceph, ...)
    S3,
    /// Directories on the local filesystem
    Local,
}

#[derive(Args, Debug, Clone)]
#[command(about = "Add, update, delete or list remote storage configurations")]
pub struct Configure {
    /// Storage name; omit to list every configured storage
    #[arg(long)]
    pub name: Option<String>,

    /// Provider type
    #[arg(long = "type", value_enum)]
    pub provider: Option<ProviderType>,

    /// S3 endpoint URL (defaults to AWS for the region)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// S3 access key
    #[arg(long)]
    pub access_key: Option<String>,

    /// S3 secret key
    #[arg(long)]
    pub secret_key: Option<String>,

    /// S3 region
    #[arg(long)]
    pub region: Option<String>,

    /// Local provider root; each sub-directory is a bucket
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Delete the named configuration
    #[arg(long)]
    pub delete: bool,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug)]
pub enum ConfigureOutput {
    Listed {
        configs: Vec<RemoteStorageConfig>,
        json: bool,
    },
    Saved(RemoteStorageConfig),
    Deleted(String),
}

impl fmt::Display for ConfigureOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigureOutput::Listed { configs, json: true } => {
                let redacted: Vec<_> = configs.iter().map(|c| c.redacted()).collect();
                write!(
                    f,
                    "{}",
                    serde_json::to_string_pretty(&redacted).unwrap_or_default()
                )
            }
            ConfigureOutput::Listed { configs, .. } if configs.is_empty() => write!(
                f,
                "No remote storage configured. Use 'rmount remote configure --name <NAME> --type <TYPE>' to add one."
            ),
            ConfigureOutput::Listed { configs, .. } => {
                writeln!(f, "{:<20}  {:<6}  {}", "NAME", "TYPE", "TARGET")?;
                write!(f, "{}", "-".repeat(60))?;
                for config in configs {
                    write!(
                        f,
                        "\n{:<20}  {:<6}  {}",
                        config.name,
                        config.provider.type_name(),
                        target(&config.provider)
                    )?;
                }
                Ok(())
            }
            ConfigureOutput::Saved(config) => write!(
                f,
                "saved remote storage {} ({})",
                config.name,
                config.provider.type_name()
            ),
            ConfigureOutput::Deleted(name) => write!(f, "deleted remote storage {}", name),
        }
    }
}

fn target(provider: &RemoteProvider) -> String {
    match provider {
        RemoteProvider::S3 {
            endpoint: Some(endpoint),
            ..
        } => endpoint.clone(),
        RemoteProvider::S3 { region, .. } => {
            format!("aws ({})", region.as_deref().unwrap_or("us-east-1"))
        }
        RemoteProvider::Local { path } => path.display().to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("{0}")]
    State(#[from] StateError),

    #[error("{0}")]
    Database(#[from] DatabaseSetupError),

    #[error("filer database: {0}")]
    Query(#[from] sqlx::Error),

    #[error("missing --{0}")]
    MissingArgument(&'static str),

    #[error("remote storage '{0}' is not configured")]
    NotFound(String),
}

impl Configure {
    fn provider(&self) -> Result<RemoteProvider, ConfigureError> {
        let required = |value: &Option<String>, flag: &'static str| {
            value.clone().ok_or(ConfigureError::MissingArgument(flag))
        };

        match self.provider.ok_or(ConfigureError::MissingArgument("type"))? {
            ProviderType::S3 => Ok(RemoteProvider::S3 {
                endpoint: self.endpoint.clone(),
                access_key: required(&self.access_key, "access-key")?,
                secret_key: required(&self.secret_key, "secret-key")?,
                region: self.region.clone(),
            }),
            ProviderType::Local => Ok(RemoteProvider::Local {
                path: self
                    .path
                    .clone()
                    .ok_or(ConfigureError::MissingArgument("path"))?,
            }),
        }
    }
}

#[async_trait::async_trait]
impl Op for Configure {
    type Error = ConfigureError;
    type Output = ConfigureOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let db = state.open_database().await?;

        let Some(name) = self.name.clone() else {
            let configs = db.list_remote_storage_configs().await?;
            return Ok(ConfigureOutput::Listed {
                configs,
                json: self.json,
            });
        };

        if self.delete {
            if !db.delete_remote_storage_config(&name).await? {
                return Err(ConfigureError::NotFound(name));
            }
            tracing::info!(remote = %name, "deleted remote storage");
            return Ok(ConfigureOutput::Deleted(name));
        }

        let config = RemoteStorageConfig::new(name, self.provider()?);
        db.upsert_remote_storage_config(&config).await?;
        tracing::info!(
            remote = %config.name,
            provider = config.provider.type_name(),
            "saved remote storage"
        );

        Ok(ConfigureOutput::Saved(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configure(provider: Option<ProviderType>) -> Configure {
        Configure {
            name: Some("cloud1".to_string()),
            provider,
            endpoint: None,
            access_key: None,
            secret_key: None,
            region: None,
            path: None,
            delete: false,
            json: false,
        }
    }

    #[test]
    fn test_s3_requires_keys() {
        let mut op = configure(Some(ProviderType::S3));
        op.access_key = Some("xxx".to_string());
        let err = op.provider().unwrap_err();
        assert_eq!(err.to_string(), "missing --secret-key");
    }

    #[test]
    fn test_type_is_required() {
        let err = configure(None).provider().unwrap_err();
        assert_eq!(err.to_string(), "missing --type");
    }

    #[test]
    fn test_listing_never_shows_secrets() {
        let output = ConfigureOutput::Listed {
            configs: vec![RemoteStorageConfig::new(
                "cloud1",
                RemoteProvider::S3 {
                    endpoint: Some("http://localhost:9000".to_string()),
                    access_key: "xxx".to_string(),
                    secret_key: "yyy".to_string(),
                    region: None,
                },
            )],
            json: true,
        };
        let printed = output.to_string();
        assert!(printed.contains("\"secret_key\": \"****\""));
        assert!(!printed.contains("yyy"));

        let ConfigureOutput::Listed { configs, .. } = output else {
            unreachable!()
        };
        let table = ConfigureOutput::Listed {
            configs,
            json: false,
        }
        .to_string();
        assert!(table.contains("http://localhost:9000"));
        assert!(!table.contains("yyy"));
    }
}
