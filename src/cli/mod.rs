//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the syncer using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Transcript Syncer - Google Drive transcripts to Markdown vault notes
#[derive(Parser, Debug)]
#[command(name = "transcript-syncer")]
#[command(version, about, long_about = None)]
#[command(author = "Transcript Syncer Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "syncer.toml", env = "SYNCER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SYNCER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync new transcripts from Google Drive into the vault
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show ledger size and recently processed items
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
