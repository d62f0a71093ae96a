//! Core sync logic for opsync.
//!
//! # Modules
//!
//! - [`extract`] - flattening search records into geo-records
//! - [`enrich`] - two-hop metadata lookups, deduplicated per `source_xml`
//! - [`retry`] - bounded exponential backoff for fallible async calls
//! - [`state`] - cursor resolution and the boundary-date delete
//! - [`sync`] - partitioning, orchestration and the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use opsync::config::load_config;
//! use opsync::core::sync::SyncCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("opsync.toml")?;
//! let coordinator = SyncCoordinator::from_config(config)?;
//!
//! let summary = coordinator.run().await?;
//! println!("Deleted: {}", summary.deleted_rows);
//! println!("Inserted: {}", summary.total_inserted());
//! # Ok(())
//! # }
//! ```

pub mod enrich;
pub mod extract;
pub mod retry;
pub mod state;
pub mod sync;
