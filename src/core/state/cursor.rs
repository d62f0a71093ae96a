//! Sync cursor
//!
//! The target tables are the only durable state. The cursor is derived from them
//! on every run: the newest `modified` date across the three layer tables, or a
//! lookback from "now" when none of them hold data yet.

use crate::adapters::database::GeoStore;
use crate::domain::{GeometryKind, OpsyncError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Cursor state of a single layer table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerCursor {
    /// Geometry layer
    pub kind: GeometryKind,
    /// Table name, for reporting
    pub table: String,
    /// Newest `modified` date, `None` if the table is absent or empty
    pub max_modified: Option<NaiveDate>,
}

/// Run-level cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncCursor {
    /// Per-table state
    pub layers: Vec<LayerCursor>,
    /// High-water mark (midnight of the newest date) or the lookback default
    pub cursor: NaiveDateTime,
    /// Whether no table had data and the lookback default was used
    pub defaulted: bool,
}

impl SyncCursor {
    /// Combine per-table state into the run-level cursor
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `now - lookback` leaves the calendar range.
    pub fn resolve(
        layers: Vec<LayerCursor>,
        now: NaiveDateTime,
        lookback: Duration,
    ) -> Result<Self> {
        let newest = layers.iter().filter_map(|layer| layer.max_modified).max();

        let cursor = match newest {
            Some(date) => Self {
                layers,
                cursor: date.and_time(chrono::NaiveTime::MIN),
                defaulted: false,
            },
            None => Self {
                layers,
                cursor: now.checked_sub_signed(lookback).ok_or_else(|| {
                    OpsyncError::Configuration(format!(
                        "lookback of {}h before {now} is out of range",
                        lookback.num_hours()
                    ))
                })?,
                defaulted: true,
            },
        };
        Ok(cursor)
    }

    /// First instant to fetch from
    ///
    /// One second past a stored high-water mark so the previous run's newest
    /// record is not requested again with `>=`; the lookback default is used as is.
    pub fn fetch_start(&self) -> NaiveDateTime {
        if self.defaulted {
            self.cursor
        } else {
            self.cursor + Duration::seconds(1)
        }
    }

    /// Day whose rows must be cleared before loading
    ///
    /// `None` when the cursor was defaulted: there is nothing to supersede.
    pub fn boundary_date(&self) -> Option<NaiveDate> {
        if self.defaulted {
            None
        } else {
            Some(self.cursor.date())
        }
    }
}

/// Read per-table high-water marks and resolve the run cursor
///
/// Missing tables are skipped, not treated as errors.
///
/// # Errors
///
/// Returns a database error if the store cannot be queried.
pub async fn read_cursor(
    store: &dyn GeoStore,
    now: NaiveDateTime,
    lookback: Duration,
) -> Result<SyncCursor> {
    let mut layers = Vec::with_capacity(GeometryKind::ALL.len());
    for kind in GeometryKind::ALL {
        let max_modified = store.max_modified(kind).await?;
        tracing::debug!(layer = %kind, max_modified = ?max_modified, "Layer high-water mark");
        layers.push(LayerCursor {
            kind,
            table: store.table_name(kind),
            max_modified,
        });
    }

    let cursor = SyncCursor::resolve(layers, now, lookback)?;
    if cursor.defaulted {
        tracing::info!(
            cursor = %cursor.cursor,
            "No layer holds data, using lookback default"
        );
    } else {
        tracing::info!(cursor = %cursor.cursor, "Resolved sync cursor");
    }

    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2024, 5, 20).and_hms_opt(6, 0, 0).unwrap()
    }

    fn layer(kind: GeometryKind, max_modified: Option<NaiveDate>) -> LayerCursor {
        LayerCursor {
            kind,
            table: kind.bucket_name().to_string(),
            max_modified,
        }
    }

    #[test]
    fn test_cursor_is_max_across_layers() {
        let cursor = SyncCursor::resolve(
            vec![
                layer(GeometryKind::Point, Some(date(2024, 5, 13))),
                layer(GeometryKind::Line, None),
                layer(GeometryKind::Polygon, Some(date(2024, 5, 17))),
            ],
            now(),
            Duration::hours(24),
        )
        .unwrap();

        assert!(!cursor.defaulted);
        assert_eq!(cursor.cursor, date(2024, 5, 17).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            cursor.fetch_start(),
            date(2024, 5, 17).and_hms_opt(0, 0, 1).unwrap()
        );
        assert_eq!(cursor.boundary_date(), Some(date(2024, 5, 17)));
    }

    #[test]
    fn test_cursor_defaults_to_lookback() {
        let cursor = SyncCursor::resolve(
            GeometryKind::ALL.iter().map(|k| layer(*k, None)).collect(),
            now(),
            Duration::hours(24),
        )
        .unwrap();

        assert!(cursor.defaulted);
        assert_eq!(cursor.fetch_start(), date(2024, 5, 19).and_hms_opt(6, 0, 0).unwrap());
        assert_eq!(cursor.boundary_date(), None);
    }

    #[test]
    fn test_lookback_past_calendar_start_is_configuration_error() {
        let result = SyncCursor::resolve(
            GeometryKind::ALL.iter().map(|k| layer(*k, None)).collect(),
            NaiveDateTime::MIN,
            Duration::hours(1),
        );

        assert!(matches!(result, Err(OpsyncError::Configuration(_))));
    }
}
