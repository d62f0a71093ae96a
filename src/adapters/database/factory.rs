//! Store factory
//!
//! Builds the production [`GeoStore`] from configuration.

use crate::adapters::database::traits::GeoStore;
use crate::adapters::postgis::{PostGisClient, PostGisStore};
use crate::config::DatabaseConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the PostGIS-backed store
///
/// The pool is created lazily; no connection is opened here.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed or the pool or
/// TLS connector cannot be built.
pub fn create_geo_store(config: &DatabaseConfig) -> Result<Arc<dyn GeoStore>> {
    tracing::info!(schema = %config.schema, ssl_mode = %config.ssl_mode, "Creating PostGIS store");
    let client = PostGisClient::new(config)?;
    Ok(Arc::new(PostGisStore::new(client, config)))
}
