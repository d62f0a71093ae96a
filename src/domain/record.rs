//! Geo-record model
//!
//! A search result from the registry is flattened into one [`GeoRecord`] per
//! area-marking geometry. The bibliographic part of the record is described by an
//! explicit, ordered field schema ([`RecordField`]) so that the extractor, the
//! loader's column list and the table DDL all agree on the same set of columns.

use crate::domain::geometry::{encode_wkt, GeometryKind};
use chrono::NaiveDate;
use geo::Geometry;
use serde::{Deserialize, Serialize};

/// XML namespace of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNamespace {
    /// `http://purl.org/dc/terms/`
    DcTerms,
    /// `http://standaarden.overheid.nl/owms/terms/`
    Overheid,
    /// `http://standaarden.overheid.nl/collectie/`
    Collectie,
    /// `http://standaarden.overheid.nl/wetgeving/`
    OverheidWetgeving,
}

impl FieldNamespace {
    /// Namespace URI
    pub fn uri(&self) -> &'static str {
        match self {
            FieldNamespace::DcTerms => "http://purl.org/dc/terms/",
            FieldNamespace::Overheid => "http://standaarden.overheid.nl/owms/terms/",
            FieldNamespace::Collectie => "http://standaarden.overheid.nl/collectie/",
            FieldNamespace::OverheidWetgeving => "http://standaarden.overheid.nl/wetgeving/",
        }
    }
}

/// Bibliographic fields copied from a search record onto every geo-record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Identifier,
    Title,
    Type,
    Creator,
    Modified,
    Authority,
    Available,
    HasVersion,
    Subject,
    Abstract,
    Publisher,
    ProductArea,
    ContentArea,
    Activiteit,
    Jaargang,
    Organisatietype,
    Publicatienummer,
    Publicatienaam,
}

impl RecordField {
    /// Fields in extraction and column order
    pub const ALL: [RecordField; 18] = [
        RecordField::Identifier,
        RecordField::Title,
        RecordField::Type,
        RecordField::Creator,
        RecordField::Modified,
        RecordField::Authority,
        RecordField::Available,
        RecordField::HasVersion,
        RecordField::Subject,
        RecordField::Abstract,
        RecordField::Publisher,
        RecordField::ProductArea,
        RecordField::ContentArea,
        RecordField::Activiteit,
        RecordField::Jaargang,
        RecordField::Organisatietype,
        RecordField::Publicatienummer,
        RecordField::Publicatienaam,
    ];

    /// Namespace the element lives in
    pub fn namespace(&self) -> FieldNamespace {
        match self {
            RecordField::Authority => FieldNamespace::Overheid,
            RecordField::ProductArea | RecordField::ContentArea => FieldNamespace::Collectie,
            RecordField::Activiteit
            | RecordField::Jaargang
            | RecordField::Organisatietype
            | RecordField::Publicatienummer
            | RecordField::Publicatienaam => FieldNamespace::OverheidWetgeving,
            _ => FieldNamespace::DcTerms,
        }
    }

    /// Local element name
    pub fn local_name(&self) -> &'static str {
        match self {
            RecordField::Identifier => "identifier",
            RecordField::Title => "title",
            RecordField::Type => "type",
            RecordField::Creator => "creator",
            RecordField::Modified => "modified",
            RecordField::Authority => "authority",
            RecordField::Available => "available",
            RecordField::HasVersion => "hasVersion",
            RecordField::Subject => "subject",
            RecordField::Abstract => "abstract",
            RecordField::Publisher => "publisher",
            RecordField::ProductArea => "product-area",
            RecordField::ContentArea => "content-area",
            RecordField::Activiteit => "activiteit",
            RecordField::Jaargang => "jaargang",
            RecordField::Organisatietype => "organisatietype",
            RecordField::Publicatienummer => "publicatienummer",
            RecordField::Publicatienaam => "publicatienaam",
        }
    }

    /// Column name in the target tables (lowercased local name)
    pub fn column(&self) -> String {
        self.local_name().to_lowercase()
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Values of the bibliographic fields, in [`RecordField::ALL`] order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographicFields {
    values: [Option<String>; 18],
}

impl BibliographicFields {
    /// Create an empty field set (every field null)
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value
    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.values[field.index()].as_deref()
    }

    /// Set a field value
    pub fn set(&mut self, field: RecordField, value: Option<String>) {
        self.values[field.index()] = value;
    }

    /// Builder-style setter
    pub fn with(mut self, field: RecordField, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    /// Iterate over `(field, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (RecordField, Option<&str>)> + '_ {
        RecordField::ALL
            .iter()
            .map(move |field| (*field, self.get(*field)))
    }

    /// The `modified` field at day granularity
    ///
    /// Accepts a bare date or any value whose first ten characters are an ISO date
    /// (`2024-05-13T10:00:00`).
    pub fn modified_date(&self) -> Option<NaiveDate> {
        self.get(RecordField::Modified)
            .and_then(|value| value.trim().get(..10))
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
    }
}

/// One area-marking geometry with the bibliographic fields of its publication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// Fields shared by all geo-records from the same publication
    pub fields: BibliographicFields,

    /// Raw geometry text (WKT); decoded later in the pipeline
    pub geometry: Option<String>,

    /// Document URL derived from the version reference
    pub source: Option<String>,

    /// Lookup-by-identifier URL used as the enrichment key
    pub source_xml: Option<String>,

    /// Tag name of the area-marking block
    pub gebiedsmarkering_type: String,

    /// Label paired with the geometry
    pub geometrie_label: Option<String>,

    /// Metadata document URL (enrichment)
    pub metadata_url: Option<String>,

    /// Reference number from the metadata document (enrichment)
    pub referentienummer: Option<String>,
}

impl GeoRecord {
    /// Columns written after the bibliographic fields, before `geometry`
    pub const DERIVED_COLUMNS: [&'static str; 6] = [
        "source",
        "source_xml",
        "gebiedsmarkering_type",
        "geometrielabel",
        "metadata_url",
        "referentienummer",
    ];

    /// Values for [`GeoRecord::DERIVED_COLUMNS`], in the same order
    pub fn derived_values(&self) -> [Option<String>; 6] {
        [
            self.source.clone(),
            self.source_xml.clone(),
            Some(self.gebiedsmarkering_type.clone()),
            self.geometrie_label.clone(),
            self.metadata_url.clone(),
            self.referentienummer.clone(),
        ]
    }

    /// Identifier of the publication this record came from
    pub fn identifier(&self) -> Option<&str> {
        self.fields.get(RecordField::Identifier)
    }
}

/// A geo-record whose geometry decoded and classified
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRecord {
    /// The flattened record, including enrichment once applied
    pub record: GeoRecord,
    /// Decoded geometry
    pub geometry: Geometry<f64>,
    /// Target layer
    pub kind: GeometryKind,
}

impl ClassifiedRecord {
    /// Geometry as WKT for storage
    pub fn geometry_wkt(&self) -> String {
        encode_wkt(&self.geometry)
    }
}

/// All column names of a target table, lowercase, in insert order
pub fn table_columns() -> Vec<String> {
    RecordField::ALL
        .iter()
        .map(RecordField::column)
        .chain(GeoRecord::DERIVED_COLUMNS.iter().map(|c| c.to_string()))
        .chain(std::iter::once("geometry".to_string()))
        .collect()
}
