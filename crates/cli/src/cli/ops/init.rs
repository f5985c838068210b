use std::path::PathBuf;

use clap::Args;

use rmount_cli::state::{AppConfig, AppState, DEFAULT_BUCKETS_ROOT, DEFAULT_LOG_LEVEL};
use rmount_cli::{DatabaseSetupError, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Filer directory bucket mounts are created under
    #[arg(long, default_value = DEFAULT_BUCKETS_ROOT)]
    pub buckets_root: String,

    /// Default log level (trace, debug, info, warn, error)
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Also write daily rolling log files to this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),

    #[error("init failed: {0}")]
    DatabaseFailed(#[from] DatabaseSetupError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            buckets_root: self.buckets_root.clone(),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let db = state.open_database().await?;
        db.close().await;

        let log_dir_str = match &state.config.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "stderr only".to_string(),
        };

        let output = format!(
            "Initialized rmount directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - Buckets root: {}\n\
             - Log level: {}\n\
             - Log dir: {}",
            state.rmount_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.buckets_root,
            state.config.log_level,
            log_dir_str
        );

        Ok(output)
    }
}
