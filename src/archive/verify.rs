use crate::config::HttpConfig;
use crate::ScoutError;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Size information about a reachable archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInfo {
    pub url: String,
    pub content_length: u64,
}

/// Builds the client used for archive checks
///
/// Response decompression is off: reqwest strips `content-length` from
/// responses it decodes, and the check needs the stored size.
pub fn build_archive_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.fetch_timeout_ms);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(false)
        .brotli(false)
        .build()
}

/// Checks that an archive can be downloaded and is not empty
///
/// Expects a client from [`build_archive_client`]. Sends a HEAD request and
/// requires:
/// - status 200
/// - a parseable `content-length` header
/// - a non-zero length
pub async fn verify_archive(client: &Client, url: &str) -> Result<ArchiveInfo, ScoutError> {
    let invalid = |reason: String| ScoutError::InvalidArchive {
        url: url.to_string(),
        reason,
    };

    let response = client
        .head(url)
        .send()
        .await
        .map_err(|e| ScoutError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if response.status() != StatusCode::OK {
        return Err(invalid(format!("returned {}", response.status())));
    }

    let header = response
        .headers()
        .get(CONTENT_LENGTH)
        .ok_or_else(|| invalid("no content length returned".to_string()))?;

    let content_length = header
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or_else(|| invalid(format!("invalid content-length: {:?}", header)))?;

    if content_length == 0 {
        return Err(invalid("archive is empty".to_string()));
    }

    tracing::info!("Archive {} is {} bytes", url, content_length);

    Ok(ArchiveInfo {
        url: url.to_string(),
        content_length,
    })
}
