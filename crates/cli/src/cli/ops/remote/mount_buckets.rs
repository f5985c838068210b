//! Mount the buckets of a remote storage under the buckets root

use std::fmt;
use std::sync::Arc;

use clap::Args;

use common::mount::{MountBuckets as MountBucketsRun, MountEnv, MountError, MountReport};
use remote_storage::RemoteStorageRegistry;
use rmount_cli::{AppState, DatabaseSetupError, SqliteFiler, StateError};

use crate::cli::op::Op;

#[derive(Args, Debug, Clone)]
#[command(about = "Mount the buckets of a remote storage, or show existing mounts")]
pub struct MountBuckets {
    /// Remote storage name; omit to print the existing mounts
    #[arg(long, default_value = "")]
    pub remote: String,

    /// Only buckets whose name matches this wildcard pattern (*, ?, [..])
    #[arg(long, default_value = "")]
    pub bucket_pattern: String,

    /// Mount the matched buckets; without it the buckets are only listed
    #[arg(long)]
    pub apply: bool,
}

/// Bucket lines and the status JSON are written to stdout while the run
/// goes, so nothing is printed after it. The summary goes to the log.
#[derive(Debug)]
pub struct MountBucketsOutput {
    report: MountReport,
    apply: bool,
}

impl MountBucketsOutput {
    pub fn summary(&self) -> String {
        match &self.report {
            MountReport::Existing(mappings) => format!("{} existing mounts", mappings.len()),
            MountReport::Buckets { matched, .. } if matched.is_empty() => {
                "no buckets matched".to_string()
            }
            MountReport::Buckets { matched, mounted } if self.apply => {
                format!("mounted {} of {} buckets", mounted.len(), matched.len())
            }
            MountReport::Buckets { matched, .. } => format!(
                "{} buckets matched, pass --apply to mount them",
                matched.len()
            ),
        }
    }
}

impl fmt::Display for MountBucketsOutput {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MountBucketsError {
    #[error("{0}")]
    State(#[from] StateError),

    #[error("{0}")]
    Database(#[from] DatabaseSetupError),

    #[error(transparent)]
    Mount(#[from] MountError),
}

#[async_trait::async_trait]
impl Op for MountBuckets {
    type Error = MountBucketsError;
    type Output = MountBucketsOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let db = state.open_database().await?;

        let registry = Arc::new(RemoteStorageRegistry::new());
        let filer = SqliteFiler::new(db, state.config.buckets_root(), registry.clone());
        let env = MountEnv::new(&filer, registry.as_ref(), &filer);

        let run = MountBucketsRun {
            remote: self.remote.clone(),
            bucket_pattern: self.bucket_pattern.clone(),
            apply: self.apply,
        };
        let mut out = std::io::stdout();
        let report = run.run(&env, &mut out).await?;

        let output = MountBucketsOutput {
            report,
            apply: self.apply,
        };
        tracing::info!(remote = %self.remote, "{}", output.summary());
        Ok(output)
    }
}
