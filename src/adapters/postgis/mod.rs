//! PostGIS target store
//!
//! - [`client`] - pooled connections with optional TLS
//! - [`sql`] - statement text for the layer tables
//! - [`store`] - the [`GeoStore`](crate::adapters::database::GeoStore) implementation

pub mod client;
pub mod sql;
pub mod store;

pub use client::PostGisClient;
pub use store::PostGisStore;
