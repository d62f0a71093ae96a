//! Sync run summary and reporting

use super::partition::PartitionStats;
use crate::adapters::sru::StopReason;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Rows inserted per layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertCounts {
    /// Rows appended to the point layer
    pub points: u64,
    /// Rows appended to the line layer
    pub lines: u64,
    /// Rows appended to the polygon layer
    pub polygons: u64,
}

impl InsertCounts {
    /// Total across layers
    pub fn total(&self) -> u64 {
        self.points + self.lines + self.polygons
    }
}

/// Summary of one sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    /// Run identifier, also attached to the run's tracing span
    pub run_id: Uuid,
    /// Resolved cursor
    pub cursor: NaiveDateTime,
    /// Whether the cursor fell back to the lookback default
    pub cursor_defaulted: bool,
    /// Start of the fetch window
    pub fetch_start: NaiveDateTime,
    /// End of the fetch window
    pub fetch_end: NaiveDateTime,
    /// Rows removed by the boundary-date delete
    pub deleted_rows: u64,
    /// Search records returned by the registry
    pub source_records: usize,
    /// Page requests issued
    pub pages: usize,
    /// Why pagination stopped
    pub stop_reason: String,
    /// Geo-records extracted from the search records
    pub geo_records: usize,
    /// Records dropped per partition gate
    pub dropped: PartitionStats,
    /// Records kept per layer before loading
    pub kept: InsertCounts,
    /// Distinct `source_xml` values looked up
    pub enrichment_lookups: usize,
    /// Lookups that produced a metadata URL
    pub metadata_urls_found: usize,
    /// Lookups that produced a reference number
    pub reference_numbers_found: usize,
    /// Rows inserted per layer
    pub inserted: InsertCounts,
    /// Deletes and inserts were skipped
    pub dry_run: bool,
    /// Wall-clock duration of the run
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl SyncSummary {
    /// Create an empty summary for a run
    pub fn new(run_id: Uuid, cursor: NaiveDateTime, fetch_start: NaiveDateTime, fetch_end: NaiveDateTime) -> Self {
        Self {
            run_id,
            cursor,
            cursor_defaulted: false,
            fetch_start,
            fetch_end,
            deleted_rows: 0,
            source_records: 0,
            pages: 0,
            stop_reason: StopReason::Exhausted.to_string(),
            geo_records: 0,
            dropped: PartitionStats::default(),
            kept: InsertCounts::default(),
            enrichment_lookups: 0,
            metadata_urls_found: 0,
            reference_numbers_found: 0,
            inserted: InsertCounts::default(),
            dry_run: false,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total rows inserted
    pub fn total_inserted(&self) -> u64 {
        self.inserted.total()
    }

    /// Net row change of the run
    pub fn net_change(&self) -> i64 {
        self.total_inserted() as i64 - self.deleted_rows as i64
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            cursor = %self.cursor,
            deleted = self.deleted_rows,
            source_records = self.source_records,
            geo_records = self.geo_records,
            decode_failures = self.dropped.decode_failures,
            unclassified = self.dropped.unclassified,
            invalid = self.dropped.invalid,
            out_of_bounds = self.dropped.out_of_bounds,
            enrichment_lookups = self.enrichment_lookups,
            inserted_points = self.inserted.points,
            inserted_lines = self.inserted.lines,
            inserted_polygons = self.inserted.polygons,
            inserted = self.total_inserted(),
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Sync completed"
        );
    }

    /// Plain-text report for the terminal
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Sync run {}\n", self.run_id));
        out.push_str(&format!(
            "  Cursor:            {}{}\n",
            self.cursor,
            if self.cursor_defaulted { " (lookback default)" } else { "" }
        ));
        out.push_str(&format!(
            "  Window:            {} .. {}\n",
            self.fetch_start, self.fetch_end
        ));
        out.push_str(&format!("  Deleted rows:      {}\n", self.deleted_rows));
        out.push_str(&format!(
            "  Source records:    {} ({} pages, stopped on {})\n",
            self.source_records, self.pages, self.stop_reason
        ));
        out.push_str(&format!("  Geo-records:       {}\n", self.geo_records));
        out.push_str(&format!(
            "  Dropped:           {} undecodable, {} unclassified, {} invalid, {} out of bounds\n",
            self.dropped.decode_failures,
            self.dropped.unclassified,
            self.dropped.invalid,
            self.dropped.out_of_bounds
        ));
        out.push_str(&format!(
            "  Enrichment:        {} lookups, {} metadata URLs, {} reference numbers\n",
            self.enrichment_lookups, self.metadata_urls_found, self.reference_numbers_found
        ));
        out.push_str(&format!(
            "  Inserted:          {} points, {} lines, {} polygons ({} total)\n",
            self.inserted.points,
            self.inserted.lines,
            self.inserted.polygons,
            self.total_inserted()
        ));
        if self.dry_run {
            out.push_str(&format!(
                "  DRY RUN:           would insert {} points, {} lines, {} polygons\n",
                self.kept.points, self.kept.lines, self.kept.polygons
            ));
        }
        out.push_str(&format!("  Duration:          {:.2}s\n", self.duration.as_secs_f64()));
        out
    }
}
