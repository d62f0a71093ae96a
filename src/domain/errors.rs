//! Domain error types
//!
//! This module defines the error hierarchy for opsync. Errors are domain-specific
//! and don't expose third-party types to callers.

use thiserror::Error;

/// Main opsync error type
///
/// Local, per-item failures (a page that fails to load, an undecodable geometry,
/// an enrichment lookup that keeps failing) are logged and swallowed by the
/// pipeline. Only structural failures surface as an `OpsyncError` from a run.
#[derive(Debug, Error)]
pub enum OpsyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search API and metadata document errors
    #[error("Search API error: {0}")]
    SearchApi(#[from] SearchApiError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(String),

    /// Geometry decoding errors
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// XML document could not be parsed or lacked required structure
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while talking to the publication registry
///
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum SearchApiError {
    /// Failed to connect to the registry
    #[error("Failed to connect: {0}")]
    ConnectionFailed(String),

    /// Non-success HTTP status
    #[error("Unexpected status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Response body could not be read or parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl SearchApiError {
    /// Whether the failure came from the server rather than the transport
    pub fn is_http_status(&self) -> bool {
        matches!(self, SearchApiError::HttpStatus { .. })
    }
}

impl From<std::io::Error> for OpsyncError {
    fn from(err: std::io::Error) -> Self {
        OpsyncError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OpsyncError {
    fn from(err: serde_json::Error) -> Self {
        OpsyncError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for OpsyncError {
    fn from(err: toml::de::Error) -> Self {
        OpsyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for OpsyncError {
    fn from(err: tokio_postgres::Error) -> Self {
        OpsyncError::Database(err.to_string())
    }
}

impl From<roxmltree::Error> for OpsyncError {
    fn from(err: roxmltree::Error) -> Self {
        OpsyncError::Extraction(format!("Malformed XML: {err}"))
    }
}
