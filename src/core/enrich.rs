//! Two-hop metadata enrichment
//!
//! For every distinct `source_xml` URL the enricher fetches the lookup document,
//! follows its metadata-manifestation link and reads the reference number from
//! the metadata document. Each hop has its own retry budget. A hop that fails
//! after all retries leaves its value null; it never fails the run.

use crate::adapters::sru::models::{find_metadata_url, find_reference_number};
use crate::adapters::sru::DocumentFetcher;
use crate::core::retry::RetryPolicy;
use crate::domain::{GeoRecord, OpsyncError, Result};
use futures::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Enrichment values for one `source_xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    /// URL of the metadata document
    pub metadata_url: Option<String>,
    /// `OVERHEIDop.referentienummer` from the metadata document
    pub referentienummer: Option<String>,
}

/// Enrichment results keyed by `source_xml`
///
/// Built fresh for every run.
#[derive(Debug, Default)]
pub struct EnrichmentIndex {
    entries: HashMap<String, Enrichment>,
}

impl EnrichmentIndex {
    /// Look up the enrichment for a `source_xml`
    pub fn get(&self, source_xml: &str) -> Option<&Enrichment> {
        self.entries.get(source_xml)
    }

    /// Number of distinct URLs looked up
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lookups were made
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of URLs that resolved to a metadata document
    pub fn metadata_urls_found(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.metadata_url.is_some())
            .count()
    }

    /// Number of URLs that resolved to a reference number
    pub fn reference_numbers_found(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.referentienummer.is_some())
            .count()
    }

    /// Copy the enrichment onto every record sharing its `source_xml`
    pub fn apply<'a>(&self, records: impl IntoIterator<Item = &'a mut GeoRecord>) {
        for record in records {
            let enrichment = record
                .source_xml
                .as_deref()
                .and_then(|url| self.entries.get(url));
            if let Some(enrichment) = enrichment {
                record.metadata_url = enrichment.metadata_url.clone();
                record.referentienummer = enrichment.referentienummer.clone();
            }
        }
    }
}

impl FromIterator<(String, Enrichment)> for EnrichmentIndex {
    fn from_iter<I: IntoIterator<Item = (String, Enrichment)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Distinct non-null `source_xml` values
pub fn distinct_source_xmls<'a>(records: impl IntoIterator<Item = &'a GeoRecord>) -> BTreeSet<String> {
    records
        .into_iter()
        .filter_map(|record| record.source_xml.clone())
        .collect()
}

/// Resolves metadata URLs and reference numbers
pub struct MetadataEnricher {
    fetcher: Arc<dyn DocumentFetcher>,
    policy: RetryPolicy,
    concurrency: usize,
}

impl MetadataEnricher {
    /// Create an enricher; `concurrency` 1 means strictly sequential lookups
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, policy: RetryPolicy, concurrency: usize) -> Self {
        Self {
            fetcher,
            policy,
            concurrency: concurrency.max(1),
        }
    }

    /// Enrich every URL in `source_xmls` once
    pub async fn enrich_all(&self, source_xmls: BTreeSet<String>) -> EnrichmentIndex {
        tracing::info!(
            urls = source_xmls.len(),
            concurrency = self.concurrency,
            "Fetching metadata for distinct publications"
        );

        stream::iter(source_xmls)
            .map(|source_xml| async move {
                let enrichment = self.lookup(&source_xml).await;
                (source_xml, enrichment)
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect()
    }

    /// Both hops for one `source_xml`
    pub async fn lookup(&self, source_xml: &str) -> Enrichment {
        let metadata_url = self
            .fetch_with_retry("metadata url", source_xml, find_metadata_url)
            .await;

        let referentienummer = match metadata_url.as_deref() {
            Some(url) => {
                self.fetch_with_retry("reference number", url, find_reference_number)
                    .await
            }
            None => None,
        };

        Enrichment {
            metadata_url,
            referentienummer,
        }
    }

    /// Fetch `url` and pull one element out of it
    ///
    /// Transport and parse failures are retried. A document that parses but lacks
    /// the element is final: it yields `None` without another request.
    async fn fetch_with_retry(
        &self,
        what: &str,
        url: &str,
        parse: fn(&str) -> Result<Option<String>>,
    ) -> Option<String> {
        let fetcher = &self.fetcher;
        let result = self
            .policy
            .run(
                what,
                move || async move {
                    let body = fetcher.fetch(url, &[]).await?;
                    parse(&body)
                },
                is_retryable,
            )
            .await;

        match result {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                tracing::debug!(url, what, "Element not present in document");
                None
            }
            Err(e) => {
                tracing::warn!(url, what, error = %e, "Lookup failed after retries");
                None
            }
        }
    }
}

fn is_retryable(error: &OpsyncError) -> bool {
    matches!(error, OpsyncError::SearchApi(_) | OpsyncError::Extraction(_))
}
