use clap::{Parser, Subcommand};

use lrcsync::cli::{core as inspect, management, operations};
use lrcsync::config::Config;
use lrcsync::error::{LrcSyncError, Result};
use lrcsync::utils;

#[derive(Parser)]
#[command(name = "lrcsync")]
#[command(about = "Follow LRC synced lyrics along a playback position")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse timed lyrics and list the recognized lines
    Parse(inspect::parse::ParseArgs),

    /// Show which line is active at a playback position
    Locate(inspect::locate::LocateArgs),

    /// Simulate playback and follow the active line
    Play(operations::play::PlayArgs),

    /// Show or change configuration
    Config(management::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The interactive player redraws the screen; keep logs out of it
    let suppress_logs = match &cli.command {
        Commands::Play(args) => operations::play::is_interactive(args),
        _ => false,
    };

    utils::logging::init_logging(cli.verbose, suppress_logs)
        .map_err(LrcSyncError::Internal)?;

    let config = Config::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Parse(args) => inspect::parse::execute(args, &config).await,
        Commands::Locate(args) => inspect::locate::execute(args, &config).await,
        Commands::Play(args) => operations::play::execute(args, &config).await,
        Commands::Config(args) => {
            management::config::execute(args, &config, cli.config.as_deref()).await
        }
    };

    result.map_err(LrcSyncError::Internal)
}
