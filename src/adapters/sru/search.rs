//! Paginated search against the registry
//!
//! Pages are requested sequentially with a 1-based `startRecord` that advances by
//! the page size. Pagination ends on the first failing request, an unparseable
//! page, an empty page, or a page shorter than the page size. Everything
//! accumulated before the stop is kept.

use super::client::DocumentFetcher;
use super::models::parse_search_page;
use crate::config::ApiConfig;
use crate::core::extract::RecordExtractor;
use crate::domain::GeoRecord;
use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;

/// Why pagination stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with no records
    Exhausted,
    /// A page held fewer records than requested
    ShortPage,
    /// A request failed (transport or non-success status)
    RequestFailed(String),
    /// A page body could not be parsed
    MalformedPage(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "empty page"),
            StopReason::ShortPage => write!(f, "short page"),
            StopReason::RequestFailed(e) => write!(f, "request failed: {e}"),
            StopReason::MalformedPage(e) => write!(f, "malformed page: {e}"),
        }
    }
}

/// Result of a paginated fetch
#[derive(Debug)]
pub struct FetchOutcome {
    /// Geo-records in page order, then document order within a page
    pub records: Vec<GeoRecord>,
    /// Number of `sru:record` elements seen
    pub source_records: usize,
    /// Number of page requests issued
    pub pages: usize,
    /// Why the loop ended
    pub stop_reason: StopReason,
}

/// Search client for the `officielepublicaties` product area
pub struct SearchClient {
    fetcher: Arc<dyn DocumentFetcher>,
    endpoint: String,
    product_area: String,
    page_size: usize,
    extractor: RecordExtractor,
}

impl SearchClient {
    /// Create a search client from the API configuration
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, config: &ApiConfig) -> Self {
        Self {
            fetcher,
            endpoint: config.endpoint.clone(),
            product_area: config.product_area.clone(),
            page_size: config.page_size.max(1),
            extractor: RecordExtractor::new(config.endpoint.clone()),
        }
    }

    /// CQL query for records modified in the window, at day granularity
    pub fn build_query(&self, start: NaiveDateTime, end: NaiveDateTime) -> String {
        format!(
            "(c.product-area=={} AND dt.modified>={} AND dt.modified<={})",
            self.product_area,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        )
    }

    /// Fetch every record modified between `start` and `end` (inclusive)
    ///
    /// Never fails: errors end pagination and are reported in
    /// [`FetchOutcome::stop_reason`].
    pub async fn fetch_since(&self, start: NaiveDateTime, end: NaiveDateTime) -> FetchOutcome {
        let query = self.build_query(start, end);
        let mut start_record = 1usize;
        let mut outcome = FetchOutcome {
            records: Vec::new(),
            source_records: 0,
            pages: 0,
            stop_reason: StopReason::Exhausted,
        };

        loop {
            let params = [
                ("query", query.clone()),
                ("startRecord", start_record.to_string()),
                ("maximumRecords", self.page_size.to_string()),
            ];

            outcome.pages += 1;
            let body = match self.fetcher.fetch(&self.endpoint, &params).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(start_record, error = %e, "Search request failed, ending pagination");
                    outcome.stop_reason = StopReason::RequestFailed(e.to_string());
                    break;
                }
            };

            let page = match parse_search_page(&body, &self.extractor) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(start_record, error = %e, "Unparseable search page, ending pagination");
                    outcome.stop_reason = StopReason::MalformedPage(e.to_string());
                    break;
                }
            };

            tracing::debug!(
                start_record,
                source_records = page.source_records,
                geo_records = page.records.len(),
                "Fetched page"
            );

            outcome.source_records += page.source_records;
            outcome.records.extend(page.records);

            if page.source_records == 0 {
                outcome.stop_reason = StopReason::Exhausted;
                break;
            }
            if page.source_records < self.page_size {
                outcome.stop_reason = StopReason::ShortPage;
                break;
            }

            start_record += self.page_size;
        }

        outcome
    }
}
