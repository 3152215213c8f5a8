mod capture_cmd;
mod config;
mod config_cmd;
mod run_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use bunwatch_logging::init_logger;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "bunwatch")]
#[command(about = "Bunwatch: camera snapshots and clips on demand, served over Discord")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.bunwatch/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Discord bot
    Run,
    /// Fetch one still image and write it to a file
    Snapshot {
        /// Output file (default: the configured snapshot filename)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Record one clip and print its path
    Clip,
    /// Show the effective configuration and validation findings
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = config::resolve_path(cli.config);
    let config = config::load(&path).await?;

    init_logger(config.log_dir().as_deref(), config.log_level());
    debug!(path = %path.display(), "Config loaded");

    match cli.command {
        Commands::Run => run_cmd::run(config).await?,
        Commands::Snapshot { out } => capture_cmd::snapshot(&config, out).await?,
        Commands::Clip => capture_cmd::clip(&config).await?,
        Commands::Config => config_cmd::run(&config, &path).await?,
    }

    Ok(())
}
