// opsync - official publication area markings to PostGIS
// Copyright (c) 2025 opsync contributors
// Licensed under the MIT License

//! # opsync - official publication area markings to PostGIS
//!
//! opsync incrementally synchronises the geographic area markings
//! (`gebiedsmarkering`) attached to Dutch official publications into three
//! PostGIS layer tables: points, lines and polygons.
//!
//! ## Overview
//!
//! A sync run:
//! - **Derives** a cursor from the newest `modified` date in the layer tables
//! - **Clears** the rows of that boundary day so it can be reloaded whole
//! - **Fetches** all publications modified since the cursor from the SRU search API
//! - **Partitions** the area markings by geometry kind, dropping invalid and
//!   out-of-bounds geometries
//! - **Enriches** each record with its metadata document URL and reference number
//! - **Appends** the result to the matching layer tables
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync pipeline (extract, enrich, state, sync)
//! - [`adapters`] - External integrations (SRU search API, PostGIS)
//! - [`domain`] - Records, geometry and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use opsync::config::load_config;
//! use opsync::core::sync::SyncCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("opsync.toml")?;
//!     let coordinator = SyncCoordinator::from_config(config)?;
//!
//!     let summary = coordinator.run().await?;
//!     println!("Inserted {} records", summary.total_inserted());
//!     Ok(())
//! }
//! ```
//!
//! ## Incremental Sync
//!
//! There is no separate state store. The boundary day is deleted and fetched
//! again on every run, so repeating a run converges on the same table contents:
//!
//! ```rust,no_run
//! use opsync::adapters::database::GeoStore;
//! use opsync::core::state::read_cursor;
//! use chrono::{Duration, Local};
//!
//! # async fn example(store: &dyn GeoStore) -> opsync::domain::Result<()> {
//! let cursor = read_cursor(store, Local::now().naive_local(), Duration::hours(24)).await?;
//! println!("next fetch starts at {}", cursor.fetch_start());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`] with [`domain::OpsyncError`]:
//!
//! ```rust,no_run
//! use opsync::domain::OpsyncError;
//!
//! fn example() -> Result<(), OpsyncError> {
//!     let _config = opsync::config::load_config("opsync.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
