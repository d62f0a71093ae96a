//! Domain models and types for opsync.
//!
//! The domain layer provides:
//! - **Geo-records** ([`GeoRecord`]) and the ordered bibliographic field schema
//!   ([`RecordField`], [`BibliographicFields`])
//! - **Geometry handling** ([`GeometryKind`], [`BoundingArea`], WKT decoding)
//! - **Error types** ([`OpsyncError`], [`SearchApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use opsync::domain::geometry::{classify, decode_wkt, GeometryKind};
//!
//! # fn example() -> opsync::domain::Result<()> {
//! let geometry = decode_wkt("POINT(155000 463000)")?;
//! assert_eq!(classify(&geometry), Some(GeometryKind::Point));
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod geometry;
pub mod record;
pub mod result;

pub use errors::{OpsyncError, SearchApiError};
pub use geometry::{BoundingArea, GeometryKind};
pub use record::{BibliographicFields, ClassifiedRecord, GeoRecord, RecordField};
pub use result::Result;
