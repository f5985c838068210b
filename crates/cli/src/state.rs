//! Application state for rmount config directories
//!
//! This module handles creating and loading an rmount directory (like
//! ~/.rmount or a custom path): the `config.toml` settings and the
//! location of the filer database.

use std::str::FromStr;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::path::FullPath;

use crate::database::{Database, DatabaseSetupError};

pub const APP_NAME: &str = "rmount";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

pub const DEFAULT_BUCKETS_ROOT: &str = "/buckets";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration stored in config.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filer directory that bucket mounts are created under
    #[serde(default = "default_buckets_root")]
    pub buckets_root: String,
    /// Default log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files (optional, logs to stderr only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_buckets_root() -> String {
    DEFAULT_BUCKETS_ROOT.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            buckets_root: default_buckets_root(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reject settings that would only fail later.
    pub fn validate(&self) -> Result<(), StateError> {
        if !self.buckets_root.starts_with('/') {
            return Err(StateError::InvalidBucketsRoot(self.buckets_root.clone()));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<tracing::Level, StateError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn buckets_root(&self) -> FullPath {
        FullPath::new(self.buckets_root.clone())
    }
}

/// Application state representing an rmount config directory
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the rmount directory (~/.rmount or custom)
    pub rmount_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the rmount directory path (custom or default ~/.rmount)
    pub fn rmount_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new rmount state directory
    pub fn init(custom_path: Option<PathBuf>, config: Option<AppConfig>) -> Result<Self, StateError> {
        let rmount_dir = Self::rmount_dir(custom_path)?;

        if rmount_dir.exists() {
            return Err(StateError::AlreadyInitialized(rmount_dir));
        }

        let config = config.unwrap_or_default();
        config.validate()?;

        fs::create_dir_all(&rmount_dir)?;

        let config_path = rmount_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            db_path: rmount_dir.join(DB_FILE_NAME),
            rmount_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the rmount directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let rmount_dir = Self::rmount_dir(custom_path)?;

        if !rmount_dir.exists() {
            return Err(StateError::NotInitialized(rmount_dir));
        }

        let config_path = rmount_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;
        config.validate()?;

        Ok(Self {
            db_path: rmount_dir.join(DB_FILE_NAME),
            rmount_dir,
            config_path,
            config,
        })
    }

    /// Open the filer database, creating and migrating it as needed
    pub async fn open_database(&self) -> Result<Database, DatabaseSetupError> {
        Database::connect(&self.db_path).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("could not determine the home directory")]
    NoHomeDirectory,

    #[error("rmount directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("rmount directory not found at {0}, run 'rmount init' first")]
    NotInitialized(PathBuf),

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("buckets root must be an absolute filer path, got '{0}'")]
    InvalidBucketsRoot(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("failed to parse config: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}
