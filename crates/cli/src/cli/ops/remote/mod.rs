//! Remote command - remote object storage
//!
//! - rmount remote configure      - Add, update, delete or list storages
//! - rmount remote mount-buckets  - Mount the buckets of a storage

use clap::{Args, Subcommand};

pub mod configure;
pub mod mount_buckets;

use crate::cli::op::Op;

crate::command_enum! {
    (Configure, configure::Configure),
    (MountBuckets, mount_buckets::MountBuckets),
}

// Rename the generated Command to RemoteCommand for clarity
pub type RemoteCommand = Command;

#[derive(Args, Debug, Clone)]
#[command(about = "Configure remote storages and mount their buckets")]
pub struct Remote {
    #[command(subcommand)]
    pub command: RemoteCommand,
}

#[async_trait::async_trait]
impl Op for Remote {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
