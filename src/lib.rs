//! Artifact Scout: locates must-gather archives behind a CI job URL
//!
//! Given a direct archive link, a job-summary page or a bucket
//! directory-listing page, this crate finds the artifacts directory of the
//! job and walks its listing pages to collect the URLs of the diagnostic
//! dump archives it contains.

pub mod archive;
pub mod config;
pub mod crawler;
pub mod progress;
pub mod url;

use thiserror::Error;

/// Main error type for Artifact Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Could not find {what} at {url}")]
    NotFound { what: String, url: String },

    #[error("No matching archives found for {url}")]
    EmptyResult { url: String },

    #[error("Archive check failed for {url}: {reason}")]
    InvalidArchive { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Discovery cancelled")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{input}': {source}")]
    Parse {
        input: String,
        source: ::url::ParseError,
    },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Artifact Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use archive::{select, Selection};
pub use config::DiscoveryConfig;
pub use crawler::{AnchorLink, DiscoveryResult, DiscoverySession, Scout};
pub use progress::ProgressSink;
pub use crate::url::{resolve, translate_to_storage};
