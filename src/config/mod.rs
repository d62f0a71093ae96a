//! Configuration management for opsync.
//!
//! Configuration comes from a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `OPSYNC_<SECTION>_<KEY>` environment overrides
//! - Default values for everything except the database DSN and the bounding area
//! - Validation before anything touches the network or the database
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! endpoint = "https://repository.overheid.nl/sru"
//! page_size = 1000
//!
//! [database]
//! connection_string = "${OPSYNC_DATABASE_URL}"
//! schema = "geo"
//!
//! [sync]
//! geometry_bounds = "POLYGON((13000 306000,278000 306000,278000 620000,13000 620000,13000 306000))"
//! ```
//!
//! ```rust,no_run
//! use opsync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("opsync.toml")?;
//! println!("Schema: {}", config.database.schema);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApiConfig, ApplicationConfig, DatabaseConfig, LoggingConfig, OpsyncConfig, RetryConfig,
    SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
