//! Geometry decoding and classification
//!
//! Area markings carry their geometry as WKT in the RD New (EPSG:28992) reference
//! system. This module turns that text into a [`geo::Geometry`], sorts it into one
//! of the three target layers and answers the "strictly within the configured
//! area" question used by the spatial filter.

use crate::domain::{OpsyncError, Result};
use geo::{Geometry, Relate, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use wkt::{ToWkt, TryFromWkt};

/// Spatial reference all geometries are stored and filtered in (RD New)
pub const RD_NEW_SRID: i32 = 28992;

/// Target layer for a decoded geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    /// Point geometries
    Point,
    /// LineString and MultiLineString geometries
    Line,
    /// Polygon and MultiPolygon geometries
    Polygon,
}

impl GeometryKind {
    /// All kinds, in load order
    pub const ALL: [GeometryKind; 3] = [GeometryKind::Point, GeometryKind::Line, GeometryKind::Polygon];

    /// Bucket name used in logs and summaries
    pub fn bucket_name(&self) -> &'static str {
        match self {
            GeometryKind::Point => "points",
            GeometryKind::Line => "lines",
            GeometryKind::Polygon => "polygons",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket_name())
    }
}

/// Decode WKT text into a geometry
///
/// # Errors
///
/// Returns [`OpsyncError::Geometry`] when the text is not valid WKT or describes
/// something `geo` cannot represent (such as `POINT EMPTY`).
pub fn decode_wkt(text: &str) -> Result<Geometry<f64>> {
    Geometry::<f64>::try_from_wkt_str(text.trim())
        .map_err(|e| OpsyncError::Geometry(format!("Failed to parse WKT: {e}")))
}

/// Encode a geometry back to WKT for storage
pub fn encode_wkt(geometry: &Geometry<f64>) -> String {
    geometry.wkt_string()
}

/// Classify a geometry into its target layer
///
/// Returns `None` for geometry kinds no layer accepts (MultiPoint,
/// GeometryCollection and the non-WKT `geo` primitives).
pub fn classify(geometry: &Geometry<f64>) -> Option<GeometryKind> {
    match geometry {
        Geometry::Point(_) => Some(GeometryKind::Point),
        Geometry::LineString(_) | Geometry::MultiLineString(_) => Some(GeometryKind::Line),
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => Some(GeometryKind::Polygon),
        Geometry::MultiPoint(_)
        | Geometry::GeometryCollection(_)
        | Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => None,
    }
}

/// OGC validity check
pub fn is_valid(geometry: &Geometry<f64>) -> bool {
    geometry.is_valid()
}

/// Area that loaded geometries must lie strictly within
#[derive(Debug, Clone)]
pub struct BoundingArea {
    area: Geometry<f64>,
}

impl BoundingArea {
    /// Parse the bounding area from a WKT Polygon or MultiPolygon
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the text is not WKT or is not areal.
    pub fn from_wkt(text: &str) -> Result<Self> {
        let area = decode_wkt(text).map_err(|e| {
            OpsyncError::Configuration(format!("sync.geometry_bounds is not valid WKT: {e}"))
        })?;

        if classify(&area) != Some(GeometryKind::Polygon) {
            return Err(OpsyncError::Configuration(
                "sync.geometry_bounds must be a POLYGON or MULTIPOLYGON".to_string(),
            ));
        }

        Ok(Self { area })
    }

    /// Whether `geometry` lies within the area
    ///
    /// Uses the DE-9IM "within" predicate: a geometry that only touches the
    /// boundary is not within.
    pub fn contains(&self, geometry: &Geometry<f64>) -> bool {
        geometry.relate(&self.area).is_within()
    }
}
