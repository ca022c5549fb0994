//! HTTP fetcher for listing pages
//!
//! This module handles all page requests made during discovery:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for listing pages, one attempt each
//! - Error classification into a single fetch error per URL
//! - Cancellation of an in-flight request

use crate::config::HttpConfig;
use crate::crawler::parser::{parse_anchors, AnchorLink};
use crate::ScoutError;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The per-request timeout bounds every fetch of a discovery run.
///
/// # Example
///
/// ```no_run
/// use artifact_scout::config::HttpConfig;
/// use artifact_scout::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.fetch_timeout_ms);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches listing pages and extracts their anchors
///
/// Cheap to clone; clones share the client's connection pool.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    client: Client,
}

impl LinkExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds an extractor with its own client
    pub fn from_config(config: &HttpConfig) -> Result<Self, ScoutError> {
        Ok(Self::new(build_http_client(config)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches `url` and returns its anchors in document order
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Non-success status | `Fetch` |
    /// | Timeout, connection or body error | `Fetch` |
    /// | Token cancelled before or during the request | `Cancelled` |
    pub async fn extract_links(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Vec<AnchorLink>, ScoutError> {
        if cancel.is_cancelled() {
            return Err(ScoutError::Cancelled);
        }

        let body = tokio::select! {
            _ = cancel.cancelled() => return Err(ScoutError::Cancelled),
            body = self.fetch_body(url) => body?,
        };

        let anchors = parse_anchors(&body);
        tracing::debug!("Extracted {} links from {}", anchors.len(), url);
        Ok(anchors)
    }

    async fn fetch_body(&self, url: &Url) -> Result<String, ScoutError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::Fetch {
                url: url.to_string(),
                message: format!("HTTP status {}", status),
            });
        }

        response.text().await.map_err(|e| fetch_error(url, &e))
    }
}

/// Classifies a transport error
fn fetch_error(url: &Url, e: &reqwest::Error) -> ScoutError {
    let message = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };

    ScoutError::Fetch {
        url: url.to_string(),
        message,
    }
}
