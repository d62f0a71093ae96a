//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: the database could not be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code: the run failed
pub const EXIT_FATAL: i32 = 5;

/// opsync - sync official-publication area markings into PostGIS
#[derive(Parser, Debug)]
#[command(name = "opsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "opsync.toml", env = "OPSYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OPSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `sync`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one incremental sync
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the per-layer high-water marks
    Status(commands::status::StatusArgs),

    /// Write a sample configuration file
    Init(commands::init::InitArgs),
}
