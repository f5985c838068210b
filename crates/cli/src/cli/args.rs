pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rmount")]
#[command(about = "Mount remote object storage buckets into the filer")]
pub struct Args {
    /// Path to the rmount config directory (defaults to ~/.rmount)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
