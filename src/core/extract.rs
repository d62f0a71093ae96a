//! Flattening of search records into geo-records
//!
//! One `sru:record` carries the bibliographic fields of a publication and any
//! number of `overheidwetgeving:gebiedsmarkering` blocks. Each block holds
//! geometry texts and labels; they are paired by position and every pair becomes
//! one [`GeoRecord`]. Surplus geometries or labels in a block are ignored.

use crate::domain::record::{BibliographicFields, FieldNamespace, GeoRecord, RecordField};
use roxmltree::Node;

/// `http://standaarden.overheid.nl/wetgeving/`
const WETGEVING_NS: &str = "http://standaarden.overheid.nl/wetgeving/";

const AREA_MARKING: &str = "gebiedsmarkering";
const GEOMETRY: &str = "geometrie";
const GEOMETRY_LABEL: &str = "geometrielabel";
const RESOURCE_IDENTIFIER: &str = "resourceIdentifier";
const HTML_SUFFIX: &str = ".html";

/// Turns search records into geo-records
///
/// Holds the registry endpoint used to build the per-identifier `source_xml`
/// lookup URL.
#[derive(Debug, Clone)]
pub struct RecordExtractor {
    lookup_endpoint: String,
}

impl RecordExtractor {
    /// Create an extractor building lookup URLs against `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            lookup_endpoint: endpoint.into(),
        }
    }

    /// Lookup URL for a single publication identifier
    pub fn lookup_url(&self, identifier: &str) -> String {
        format!("{}?&query=(dt.identifier={})", self.lookup_endpoint, identifier)
    }

    /// Extract all geo-records from one search record
    pub fn extract(&self, record: Node<'_, '_>) -> Vec<GeoRecord> {
        let fields = extract_fields(record);
        let source = version_source(record);
        let source_xml = fields
            .get(RecordField::Identifier)
            .map(|identifier| self.lookup_url(identifier));

        let mut records = Vec::new();
        for marking in descendants_named(record, WETGEVING_NS, AREA_MARKING) {
            let marking_type = marking.tag_name().name().to_string();
            let geometries = descendants_named(marking, WETGEVING_NS, GEOMETRY);
            let labels = descendants_named(marking, WETGEVING_NS, GEOMETRY_LABEL);

            for (geometry, label) in geometries.zip(labels) {
                records.push(GeoRecord {
                    fields: fields.clone(),
                    geometry: geometry.text().map(str::to_string),
                    source: source.as_ref().map(|base| format!("{base}{HTML_SUFFIX}")),
                    source_xml: source_xml.clone(),
                    gebiedsmarkering_type: marking_type.clone(),
                    geometrie_label: label.text().map(str::to_string),
                    metadata_url: None,
                    referentienummer: None,
                });
            }
        }

        records
    }
}

/// Read the fixed field set from a record; absent elements stay null
pub fn extract_fields(record: Node<'_, '_>) -> BibliographicFields {
    let mut fields = BibliographicFields::new();
    for field in RecordField::ALL {
        let value = first_named(record, field.namespace(), field.local_name())
            .and_then(|node| node.text())
            .map(str::to_string);
        fields.set(field, value);
    }
    fields
}

/// Base document id from `dcterms:hasVersion/@resourceIdentifier`, without `.html`
fn version_source(record: Node<'_, '_>) -> Option<String> {
    let version = first_named(
        record,
        RecordField::HasVersion.namespace(),
        RecordField::HasVersion.local_name(),
    )?;
    let identifier = version.attribute(RESOURCE_IDENTIFIER)?;
    let base = identifier.strip_suffix(HTML_SUFFIX).unwrap_or(identifier);
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}

fn first_named<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: FieldNamespace,
    local: &'a str,
) -> Option<Node<'a, 'input>> {
    descendants_named(node, namespace.uri(), local).next()
}

fn descendants_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: &'a str,
    local: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.descendants()
        .skip(1)
        .filter(move |n| n.is_element() && n.has_tag_name((namespace, local)))
}
