//! Validate config command implementation

use crate::adapters::postgis::client::redact_dsn;
use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates; a config that loads is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid: {config_path}");
                println!("  {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("Configuration is valid: {config_path}");
        println!();
        println!("  Log level:        {}", config.application.log_level);
        println!("  Dry run:          {}", config.application.dry_run);
        println!("  Endpoint:         {}", config.api.endpoint);
        println!("  Product area:     {}", config.api.product_area);
        println!("  Page size:        {}", config.api.page_size);
        println!(
            "  Database:         {}",
            redact_dsn(config.database.connection_string.expose_secret().as_ref())
        );
        println!(
            "  Layers:           {s}.{p}, {s}.{l}, {s}.{g}",
            s = config.database.schema,
            p = config.database.layer_point,
            l = config.database.layer_line,
            g = config.database.layer_polygon
        );
        println!("  Lookback:         {}h", config.sync.lookback_hours);
        println!(
            "  Enrichment:       {} concurrent, {} attempts",
            config.sync.enrichment_concurrency, config.api.retry.max_attempts
        );

        Ok(EXIT_OK)
    }
}
