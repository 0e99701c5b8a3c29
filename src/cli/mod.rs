//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// NFC-e Migrator - replays legacy receipts into the scan-processing service
#[derive(Parser, Debug)]
#[command(name = "nfce-migrator")]
#[command(version, about, long_about = None)]
#[command(author = "NFC-e Migrator Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "nfce-migrator.toml", env = "NFCE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NFCE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate legacy receipts to the scan service
    Migrate(commands::migrate::MigrateArgs),

    /// Walk a few receipts without submitting them
    DryRun(commands::dry_run::DryRunArgs),

    /// Check the legacy database and the scan service are reachable
    TestConnection(commands::test_connection::TestConnectionArgs),

    /// Show eligible receipts and the scan service status document
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
