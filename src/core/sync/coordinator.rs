//! Sync coordinator - end-to-end orchestration of one run
//!
//! The run sequence is:
//!
//! 1. Resolve the cursor from the layer tables
//! 2. Delete boundary-date rows across all layers
//! 3. Fetch every record modified since the cursor
//! 4. Decode, classify, validity-check and bounds-filter the geometries
//! 5. Enrich each distinct `source_xml` once and join the results back
//! 6. Append each non-empty layer bucket
//! 7. Report deleted and inserted counts

use crate::adapters::database::{create_geo_store, GeoStore};
use crate::adapters::sru::{DocumentFetcher, HttpFetcher, SearchClient};
use crate::config::OpsyncConfig;
use crate::core::enrich::{distinct_source_xmls, MetadataEnricher};
use crate::core::retry::RetryPolicy;
use crate::core::state::{clear_boundary, read_cursor};
use crate::core::sync::partition::Partitioner;
use crate::core::sync::summary::SyncSummary;
use crate::domain::geometry::BoundingArea;
use crate::domain::{GeometryKind, Result};
use crate::{log_stage_complete, log_sync_start};
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

/// Sync coordinator
pub struct SyncCoordinator {
    config: OpsyncConfig,
    search: SearchClient,
    enricher: MetadataEnricher,
    store: Arc<dyn GeoStore>,
    bounds: BoundingArea,
    dry_run: bool,
}

impl SyncCoordinator {
    /// Create a coordinator over explicit collaborators
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the bounding area cannot be parsed.
    pub fn new(
        config: OpsyncConfig,
        fetcher: Arc<dyn DocumentFetcher>,
        store: Arc<dyn GeoStore>,
    ) -> Result<Self> {
        let bounds = config.sync.bounding_area()?;
        let search = SearchClient::new(fetcher.clone(), &config.api);
        let enricher = MetadataEnricher::new(
            fetcher,
            RetryPolicy::from(&config.api.retry),
            config.sync.enrichment_concurrency,
        );
        let dry_run = config.application.dry_run;

        Ok(Self {
            config,
            search,
            enricher,
            store,
            bounds,
            dry_run,
        })
    }

    /// Create a coordinator talking to the real registry and PostGIS
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the database pool cannot be built.
    pub fn from_config(config: OpsyncConfig) -> Result<Self> {
        let fetcher: Arc<dyn DocumentFetcher> = Arc::new(HttpFetcher::new(&config.api)?);
        let store = create_geo_store(&config.database)?;
        Self::new(config, fetcher, store)
    }

    /// Override dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The store this coordinator writes to
    pub fn store(&self) -> &Arc<dyn GeoStore> {
        &self.store
    }

    /// Execute one sync run against the local clock
    ///
    /// # Errors
    ///
    /// Returns an error only for structural failures: the store cannot be read,
    /// the boundary delete fails, or a load transaction fails.
    pub async fn run(&self) -> Result<SyncSummary> {
        self.run_at(Local::now().naive_local()).await
    }

    /// Execute one sync run with an explicit "now"
    ///
    /// # Errors
    ///
    /// See [`SyncCoordinator::run`].
    pub async fn run_at(&self, now: NaiveDateTime) -> Result<SyncSummary> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id, dry_run = self.dry_run);
        self.execute(run_id, now).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid, now: NaiveDateTime) -> Result<SyncSummary> {
        let run_started = Instant::now();
        let store = self.store.as_ref();

        // Cursor
        let stage = Instant::now();
        let lookback = self.config.sync.lookback()?;
        let cursor = read_cursor(store, now, lookback).await?;
        log_stage_complete!("cursor", stage.elapsed());

        let fetch_start = cursor.fetch_start();
        let mut summary = SyncSummary::new(run_id, cursor.cursor, fetch_start, now);
        summary.cursor_defaulted = cursor.defaulted;
        summary.dry_run = self.dry_run;
        log_sync_start!(fetch_start, now, self.dry_run);

        // Boundary delete
        let stage = Instant::now();
        summary.deleted_rows = clear_boundary(store, &cursor, self.dry_run).await?;
        log_stage_complete!("delete", stage.elapsed(), deleted = summary.deleted_rows);

        // Fetch
        let stage = Instant::now();
        let fetched = self.search.fetch_since(fetch_start, now).await;
        summary.source_records = fetched.source_records;
        summary.pages = fetched.pages;
        summary.stop_reason = fetched.stop_reason.to_string();
        summary.geo_records = fetched.records.len();
        log_stage_complete!(
            "fetch",
            stage.elapsed(),
            pages = fetched.pages,
            source_records = fetched.source_records,
            geo_records = fetched.records.len()
        );

        // Decode, classify, filter
        let stage = Instant::now();
        let partitioner = Partitioner::new(&self.bounds, self.config.sync.drop_invalid_geometries);
        let (mut buckets, dropped) = partitioner.partition(fetched.records);
        summary.dropped = dropped;
        summary.kept.points = buckets.points.len() as u64;
        summary.kept.lines = buckets.lines.len() as u64;
        summary.kept.polygons = buckets.polygons.len() as u64;
        log_stage_complete!(
            "partition",
            stage.elapsed(),
            points = buckets.points.len(),
            lines = buckets.lines.len(),
            polygons = buckets.polygons.len()
        );

        // Enrich
        let stage = Instant::now();
        let source_xmls = distinct_source_xmls(buckets.records());
        let index = self.enricher.enrich_all(source_xmls).await;
        index.apply(buckets.records_mut());
        summary.enrichment_lookups = index.len();
        summary.metadata_urls_found = index.metadata_urls_found();
        summary.reference_numbers_found = index.reference_numbers_found();
        log_stage_complete!(
            "enrich",
            stage.elapsed(),
            lookups = index.len(),
            metadata_urls = index.metadata_urls_found(),
            reference_numbers = index.reference_numbers_found()
        );

        // Load
        let stage = Instant::now();
        for kind in GeometryKind::ALL {
            let rows = buckets.get(kind);
            if rows.is_empty() {
                continue;
            }

            if self.dry_run {
                tracing::info!(
                    layer = %kind,
                    table = %store.table_name(kind),
                    rows = rows.len(),
                    "DRY RUN: would append rows"
                );
                continue;
            }

            let inserted = store.append(kind, rows).await?;
            match kind {
                GeometryKind::Point => summary.inserted.points = inserted,
                GeometryKind::Line => summary.inserted.lines = inserted,
                GeometryKind::Polygon => summary.inserted.polygons = inserted,
            }
        }
        log_stage_complete!("load", stage.elapsed(), inserted = summary.total_inserted());

        let summary = summary.with_duration(run_started.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}
