//! Database abstraction layer
//!
//! The pipeline talks to the target store through the [`GeoStore`] trait; the
//! factory wires up the PostGIS implementation.

pub mod factory;
pub mod traits;

pub use factory::create_geo_store;
pub use traits::GeoStore;
