//! TrackMix CLI
//!
//! A command-line front end for remuxing selected media tracks into a new
//! container without re-encoding, wrapping an external transcoding tool.
//!
//! # Usage
//!
//! ```bash
//! trackmix probe -i movie.mkv -i extras.mp4
//! trackmix mix -i movie.mkv -i subs.srt --tracks "0:v 0:a 1:s" -o remux.mkv
//! trackmix shell
//! ```

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trackmix_cli::cli::{commands, shell, Cli, Commands};
use trackmix_cli::config::{MixerConfig, CONFIG_FILE, DEFAULT_TOOL};

/// Main entry point for the TrackMix CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load the optional config file; flags and environment win over it
    let config = MixerConfig::load(Path::new(CONFIG_FILE))?;

    // Initialize logging: RUST_LOG wins, then --log-level, then the config
    let level = cli
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let tool = cli
        .ffmpeg
        .clone()
        .or(config.ffmpeg)
        .unwrap_or_else(|| DEFAULT_TOOL.to_string());
    info!(tool = %tool, "starting TrackMix");

    // Execute the requested command
    match cli.command {
        Commands::Probe(args) => commands::probe(&tool, args).await?,
        Commands::Mix(args) => commands::mix(&tool, args).await?,
        Commands::Shell => shell::run(&tool).await?,
    }

    Ok(())
}
