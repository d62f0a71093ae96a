//! HTTP access to the publication registry
//!
//! The pipeline only ever needs "GET this URL and give me the body", so the seam
//! is the small [`DocumentFetcher`] trait. [`HttpFetcher`] is the reqwest-backed
//! implementation; tests substitute in-memory fakes.

use crate::config::ApiConfig;
use crate::domain::{OpsyncError, Result, SearchApiError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Fetches XML documents over HTTP
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// GET `url` with the given query parameters and return the response body
    ///
    /// # Errors
    ///
    /// Returns [`SearchApiError::HttpStatus`] for a non-2xx response and another
    /// [`SearchApiError`] variant for transport failures.
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String>;
}

/// reqwest-backed [`DocumentFetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("opsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OpsyncError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        tracing::debug!(url, params = query.len(), "GET");

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SearchApiError::Timeout(format!("{url}: {e}"))
            } else {
                SearchApiError::ConnectionFailed(format!("{url}: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchApiError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchApiError::InvalidResponse(format!("{url}: {e}")))?;

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sru")
            .match_query(mockito::Matcher::UrlEncoded(
                "startRecord".into(),
                "1001".into(),
            ))
            .with_status(200)
            .with_body("<ok/>")
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&ApiConfig::default()).unwrap();
        let url = format!("{}/sru", server.url());
        let body = fetcher
            .fetch(&url, &[("startRecord", "1001".to_string())])
            .await
            .unwrap();

        assert_eq!(body, "<ok/>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sru")
            .with_status(503)
            .create_async()
            .await;

        let fetcher = HttpFetcher::new(&ApiConfig::default()).unwrap();
        let url = format!("{}/sru", server.url());
        let err = fetcher.fetch(&url, &[]).await.unwrap_err();

        match err {
            OpsyncError::SearchApi(SearchApiError::HttpStatus { status, .. }) => {
                assert_eq!(status, 503)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let fetcher = HttpFetcher::new(&ApiConfig::default()).unwrap();
        let err = fetcher
            .fetch("http://127.0.0.1:1/sru", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, OpsyncError::SearchApi(_)));
    }
}
