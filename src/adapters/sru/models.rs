//! SRU response and metadata document formats

use crate::core::extract::RecordExtractor;
use crate::domain::{GeoRecord, Result};
use roxmltree::{Document, ParsingOptions};

/// SRU response namespace (`sru:` prefix)
pub const SRU_NS: &str = "http://docs.oasis-open.org/ns/search-ws/sruResponse";

/// Registry extension namespace (`gzd:` prefix)
pub const GZD_NS: &str = "http://standaarden.overheid.nl/sru";

/// Manifestation value marking the metadata document link
pub const METADATA_MANIFESTATION: &str = "metadata";

/// `name` attribute of the reference-number metadata element
pub const REFERENCE_NUMBER_NAME: &str = "OVERHEIDop.referentienummer";

/// Parse a registry document; metadata documents may carry a DOCTYPE
fn parse_document(body: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(body, options)?)
}

/// One parsed result page
#[derive(Debug, Default)]
pub struct SearchPage {
    /// Number of `sru:record` elements on the page
    pub source_records: usize,
    /// Geo-records extracted from those records, in document order
    pub records: Vec<GeoRecord>,
}

/// Parse one SRU result page and flatten its records
///
/// # Errors
///
/// Returns an extraction error if the body is not well-formed XML.
pub fn parse_search_page(body: &str, extractor: &RecordExtractor) -> Result<SearchPage> {
    let doc = parse_document(body)?;

    let mut page = SearchPage::default();
    for record in doc
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name((SRU_NS, "record")))
    {
        page.source_records += 1;
        page.records.extend(extractor.extract(record));
    }

    Ok(page)
}

/// Metadata document URL from a lookup-by-identifier response
///
/// Looks for `gzd:itemUrl[@manifestation="metadata"]`. `Ok(None)` means the
/// document parsed but carries no such link.
///
/// # Errors
///
/// Returns an extraction error if the body is not well-formed XML.
pub fn find_metadata_url(body: &str) -> Result<Option<String>> {
    let doc = parse_document(body)?;

    let url = doc
        .descendants()
        .find(|n| {
            n.has_tag_name((GZD_NS, "itemUrl"))
                && n.attribute("manifestation") == Some(METADATA_MANIFESTATION)
        })
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    Ok(url)
}

/// Reference number from a metadata document
///
/// Looks for an un-namespaced `metadata[@name="OVERHEIDop.referentienummer"]`
/// and returns its `content` attribute.
///
/// # Errors
///
/// Returns an extraction error if the body is not well-formed XML.
pub fn find_reference_number(body: &str) -> Result<Option<String>> {
    let doc = parse_document(body)?;

    let reference = doc
        .descendants()
        .find(|n| {
            n.is_element()
                && n.tag_name().namespace().is_none()
                && n.tag_name().name() == "metadata"
                && n.attribute("name") == Some(REFERENCE_NUMBER_NAME)
        })
        .and_then(|n| n.attribute("content"))
        .map(str::to_string);

    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sru:searchRetrieveResponse xmlns:sru="http://docs.oasis-open.org/ns/search-ws/sruResponse"
    xmlns:gzd="http://standaarden.overheid.nl/sru">
  <sru:records>
    <sru:record>
      <sru:recordData>
        <gzd:gzd>
          <gzd:enrichedData>
            <gzd:itemUrl manifestation="html">https://zoek.officielebekendmakingen.nl/gmb-2024-1.html</gzd:itemUrl>
            <gzd:itemUrl manifestation="metadata">https://repository.overheid.nl/frbr/officielepublicaties/gmb/2024/gmb-2024-1/1/metadata/metadata.xml</gzd:itemUrl>
          </gzd:enrichedData>
        </gzd:gzd>
      </sru:recordData>
    </sru:record>
  </sru:records>
</sru:searchRetrieveResponse>"#;

    const METADATA_DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata_gegevens>
  <metadata name="DC.title" content="Omgevingsvergunning"/>
  <metadata name="OVERHEIDop.referentienummer" content="Z/24/123456"/>
</metadata_gegevens>"#;

    #[test]
    fn test_find_metadata_url() {
        let url = find_metadata_url(LOOKUP_RESPONSE).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://repository.overheid.nl/frbr/officielepublicaties/gmb/2024/gmb-2024-1/1/metadata/metadata.xml")
        );
    }

    #[test]
    fn test_find_metadata_url_absent() {
        let body = r#"<r xmlns:gzd="http://standaarden.overheid.nl/sru"><gzd:itemUrl manifestation="html">x</gzd:itemUrl></r>"#;
        assert_eq!(find_metadata_url(body).unwrap(), None);
    }

    #[test]
    fn test_find_reference_number() {
        assert_eq!(
            find_reference_number(METADATA_DOCUMENT).unwrap().as_deref(),
            Some("Z/24/123456")
        );
        assert_eq!(find_reference_number("<metadata_gegevens/>").unwrap(), None);
    }

    #[test]
    fn test_malformed_documents_are_errors() {
        assert!(find_metadata_url("<broken").is_err());
        assert!(find_reference_number("not xml at all").is_err());
        assert!(parse_search_page("<a><b></a>", &RecordExtractor::new("http://x")).is_err());
    }

    #[test]
    fn test_parse_page_counts_records_without_markings() {
        let body = r#"<sru:searchRetrieveResponse xmlns:sru="http://docs.oasis-open.org/ns/search-ws/sruResponse">
  <sru:records>
    <sru:record><sru:recordData/></sru:record>
    <sru:record><sru:recordData/></sru:record>
  </sru:records>
</sru:searchRetrieveResponse>"#;

        let page = parse_search_page(body, &RecordExtractor::new("http://x")).unwrap();
        assert_eq!(page.source_records, 2);
        assert!(page.records.is_empty());
    }
}
