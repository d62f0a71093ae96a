//! Decode, classify and filter geo-records into layer buckets
//!
//! Records move through four gates in order: WKT decoding, layer classification,
//! the optional OGC validity check, and the strict "within" test against the
//! bounding area. A record failing any gate is dropped and counted; nothing here
//! is fatal.

use crate::domain::geometry::{classify, decode_wkt, is_valid, BoundingArea};
use crate::domain::{ClassifiedRecord, GeoRecord, GeometryKind};
use serde::Serialize;

/// Records per target layer
#[derive(Debug, Default)]
pub struct Buckets {
    /// Point geometries
    pub points: Vec<ClassifiedRecord>,
    /// (Multi)LineString geometries
    pub lines: Vec<ClassifiedRecord>,
    /// (Multi)Polygon geometries
    pub polygons: Vec<ClassifiedRecord>,
}

impl Buckets {
    /// Records of one layer
    pub fn get(&self, kind: GeometryKind) -> &[ClassifiedRecord] {
        match kind {
            GeometryKind::Point => &self.points,
            GeometryKind::Line => &self.lines,
            GeometryKind::Polygon => &self.polygons,
        }
    }

    fn get_mut(&mut self, kind: GeometryKind) -> &mut Vec<ClassifiedRecord> {
        match kind {
            GeometryKind::Point => &mut self.points,
            GeometryKind::Line => &mut self.lines,
            GeometryKind::Polygon => &mut self.polygons,
        }
    }

    /// Total number of records across layers
    pub fn len(&self) -> usize {
        self.points.len() + self.lines.len() + self.polygons.len()
    }

    /// Whether every layer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutable access to every record's geo-record, for enrichment
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut GeoRecord> {
        self.points
            .iter_mut()
            .chain(self.lines.iter_mut())
            .chain(self.polygons.iter_mut())
            .map(|classified| &mut classified.record)
    }

    /// Every geo-record across layers
    pub fn records(&self) -> impl Iterator<Item = &GeoRecord> {
        self.points
            .iter()
            .chain(self.lines.iter())
            .chain(self.polygons.iter())
            .map(|classified| &classified.record)
    }
}

/// Counts of records dropped at each gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    /// Geometry text missing or not decodable
    pub decode_failures: usize,
    /// Decoded to a kind no layer accepts
    pub unclassified: usize,
    /// Failed the validity check
    pub invalid: usize,
    /// Not strictly within the bounding area
    pub out_of_bounds: usize,
}

/// Partitioning rules
pub struct Partitioner<'a> {
    bounds: &'a BoundingArea,
    drop_invalid: bool,
}

impl<'a> Partitioner<'a> {
    /// Create a partitioner for a bounding area
    pub fn new(bounds: &'a BoundingArea, drop_invalid: bool) -> Self {
        Self {
            bounds,
            drop_invalid,
        }
    }

    /// Sort records into layer buckets, preserving input order within a layer
    pub fn partition(&self, records: Vec<GeoRecord>) -> (Buckets, PartitionStats) {
        let mut buckets = Buckets::default();
        let mut stats = PartitionStats::default();

        for record in records {
            let decoded = match record.geometry.as_deref().map(decode_wkt) {
                Some(Ok(geometry)) => geometry,
                Some(Err(e)) => {
                    tracing::debug!(identifier = ?record.identifier(), error = %e, "Dropping undecodable geometry");
                    stats.decode_failures += 1;
                    continue;
                }
                None => {
                    tracing::debug!(identifier = ?record.identifier(), "Dropping record without geometry");
                    stats.decode_failures += 1;
                    continue;
                }
            };

            let Some(kind) = classify(&decoded) else {
                stats.unclassified += 1;
                continue;
            };

            if self.drop_invalid && !is_valid(&decoded) {
                tracing::debug!(identifier = ?record.identifier(), layer = %kind, "Dropping invalid geometry");
                stats.invalid += 1;
                continue;
            }

            if !self.bounds.contains(&decoded) {
                stats.out_of_bounds += 1;
                continue;
            }

            buckets.get_mut(kind).push(ClassifiedRecord {
                record,
                geometry: decoded,
                kind,
            });
        }

        if stats.decode_failures > 0 || stats.invalid > 0 {
            tracing::warn!(
                decode_failures = stats.decode_failures,
                invalid = stats.invalid,
                "Dropped geometries that could not be used"
            );
        }

        (buckets, stats)
    }
}
