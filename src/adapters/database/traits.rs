//! Storage abstraction for the three geometry layers
//!
//! The sync pipeline only needs four things from the target store: whether a
//! layer table exists, its newest `modified` date, a date-wide delete across all
//! layers, and an append. [`GeoStore`] captures exactly that so the pipeline can
//! run against PostGIS in production and an in-memory store in tests.

use crate::domain::{ClassifiedRecord, GeometryKind, Result};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Target store for classified geo-records
#[async_trait]
pub trait GeoStore: Send + Sync {
    /// Verify the store is reachable
    async fn test_connection(&self) -> Result<()>;

    /// Human-readable name of the layer table, for logs
    fn table_name(&self, kind: GeometryKind) -> String;

    /// Whether the layer table exists
    async fn table_exists(&self, kind: GeometryKind) -> Result<bool>;

    /// Newest `modified` date in the layer table
    ///
    /// `Ok(None)` when the table is absent or holds no dated rows.
    async fn max_modified(&self, kind: GeometryKind) -> Result<Option<NaiveDate>>;

    /// Delete every row whose `modified` falls on `date`, across all existing
    /// layer tables, in a single transaction
    ///
    /// Returns the total number of rows deleted.
    async fn delete_modified_on(&self, date: NaiveDate) -> Result<u64>;

    /// Append rows to the layer table for `kind`, creating it if needed
    ///
    /// Returns the number of rows inserted.
    async fn append(&self, kind: GeometryKind, rows: &[ClassifiedRecord]) -> Result<u64>;
}
