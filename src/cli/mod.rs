//! CLI module for TrackMix
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;
pub mod shell;

/// TrackMix
///
/// A command-line front end for remuxing selected media tracks into a new
/// container without re-encoding.
#[derive(Parser)]
#[command(name = "trackmix")]
#[command(about = "TrackMix - pick tracks across inputs and remux them into one file")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (overrides the config file; RUST_LOG wins over both)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// External tool binary used for probing and mixing
    #[arg(long, env = "TRACKMIX_FFMPEG", global = true)]
    pub ffmpeg: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Probe inputs and list their tracks and chapters
    Probe(args::ProbeArgs),
    /// Remux selected tracks into a new container
    Mix(args::MixArgs),
    /// Interactive menu for probing and mixing
    Shell,
}
