//! Publication registry (SRU) adapter
//!
//! - [`client`] - HTTP document fetching behind the [`DocumentFetcher`] trait
//! - [`models`] - namespaces and parsing of result pages and metadata documents
//! - [`search`] - paginated retrieval of changed records

pub mod client;
pub mod models;
pub mod search;

pub use client::{DocumentFetcher, HttpFetcher};
pub use search::{FetchOutcome, SearchClient, StopReason};
