//! Boundary-date clearing before a load
//!
//! The registry is queried at day granularity, so a previous run may have loaded
//! only part of the boundary day. All rows of that day are removed from every
//! layer, inside or outside the bounding area, and the current run reloads
//! whatever the registry now returns for it.

use super::cursor::SyncCursor;
use crate::adapters::database::GeoStore;
use crate::domain::Result;

/// Delete the cursor's boundary-day rows across all layers
///
/// Returns the number of rows deleted; zero when the cursor was defaulted or in
/// dry-run mode.
///
/// # Errors
///
/// Returns a database error if the delete transaction fails.
pub async fn clear_boundary(store: &dyn GeoStore, cursor: &SyncCursor, dry_run: bool) -> Result<u64> {
    let Some(date) = cursor.boundary_date() else {
        tracing::info!("No prior data, nothing to delete");
        return Ok(0);
    };

    if dry_run {
        tracing::info!(%date, "DRY RUN: would delete rows modified on boundary date");
        return Ok(0);
    }

    let deleted = store.delete_modified_on(date).await?;
    tracing::info!(%date, deleted, "Deleted boundary-date rows");
    Ok(deleted)
}
