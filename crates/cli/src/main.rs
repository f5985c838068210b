// CLI modules
mod cli;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Init, Remote, Version};

use rmount_cli::{init_logging, AppState, LogConfig};

command_enum! {
    (Init, Init),
    (Remote, Remote),
    (Version, Version),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Log settings come from config.toml once the state directory exists
    let log_config = AppState::load(args.config_path.clone())
        .map(|state| LogConfig::from(&state.config))
        .unwrap_or_default();
    let guards = init_logging(&log_config);

    let ctx = cli::op::OpContext::new(args.config_path);

    // exit() skips destructors, so the log guards are dropped by hand first
    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            let output = output.to_string();
            if !output.is_empty() {
                println!("{}", output);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    drop(guards);
    std::process::exit(code);
}
