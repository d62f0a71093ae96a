//! Sync command implementation

use crate::cli::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use crate::core::sync::SyncCoordinator;
use crate::domain::OpsyncError;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Run the full pipeline but skip deletes and inserts
    #[arg(long)]
    pub dry_run: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let coordinator = match SyncCoordinator::from_config(config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize sync");
                eprintln!("Failed to initialize sync: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Err(e) = coordinator.store().test_connection().await {
            tracing::error!(error = %e, "Database connection failed");
            eprintln!("Database connection failed: {e}");
            return Ok(EXIT_CONNECTION);
        }

        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(e @ OpsyncError::Configuration(_)) => {
                tracing::error!(error = %e, "Invalid sync configuration");
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
            Err(e) => {
                log_error_with_context!(&e, "Sync run failed");
                eprintln!("Sync failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print!("{}", summary.render());
        }

        Ok(EXIT_OK)
    }
}
