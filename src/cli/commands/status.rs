//! Status command implementation
//!
//! Prints the high-water mark of each layer table and the cursor the next sync
//! would start from.

use crate::adapters::database::create_geo_store;
use crate::cli::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_OK};
use crate::config::load_config;
use crate::core::state::read_cursor;
use crate::domain::OpsyncError;
use chrono::Local;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the cursor as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let store = match create_geo_store(&config.database) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to create database client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Err(e) = store.test_connection().await {
            eprintln!("Database connection failed: {e}");
            return Ok(EXIT_CONNECTION);
        }

        let now = Local::now().naive_local();
        let lookback = match config.sync.lookback() {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        let cursor = match read_cursor(store.as_ref(), now, lookback).await {
            Ok(c) => c,
            Err(e @ OpsyncError::Configuration(_)) => {
                eprintln!("{e}");
                return Ok(EXIT_CONFIG);
            }
            Err(e) => {
                eprintln!("Failed to read layer tables: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&cursor)?);
            return Ok(EXIT_OK);
        }

        println!("Layer status");
        for layer in &cursor.layers {
            let newest = layer
                .max_modified
                .map(|d| d.to_string())
                .unwrap_or_else(|| "no data".to_string());
            println!("  {:<10} {:<40} {}", layer.kind.to_string(), layer.table, newest);
        }
        println!();
        if cursor.defaulted {
            println!(
                "Next sync starts at {} ({}h lookback, nothing to delete)",
                cursor.fetch_start(),
                config.sync.lookback_hours
            );
        } else {
            println!(
                "Next sync starts at {} and first clears rows modified on {}",
                cursor.fetch_start(),
                cursor.cursor.date()
            );
        }

        Ok(EXIT_OK)
    }
}
