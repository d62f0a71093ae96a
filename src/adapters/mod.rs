//! External system integrations for opsync.
//!
//! - [`sru`] - the publication registry's SRU search API and metadata documents
//! - [`database`] - storage abstraction ([`database::GeoStore`]) and factory
//! - [`postgis`] - PostgreSQL/PostGIS implementation of the store
//!
//! Adapters isolate external dependencies behind traits so the pipeline can be
//! tested with in-memory implementations.

pub mod database;
pub mod postgis;
pub mod sru;
