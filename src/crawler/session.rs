//! Discovery entry point
//!
//! A [`Scout`] is built once from a [`DiscoveryConfig`] and can serve any
//! number of concurrent discovery runs. Each run gets its own
//! [`DiscoverySession`]; nothing mutable is shared between runs.

use crate::config::{validate, DiscoveryConfig};
use crate::crawler::fetcher::LinkExtractor;
use crate::crawler::locator::RootLocation;
use crate::crawler::parser::AnchorLink;
use crate::progress::ProgressSink;
use crate::url::parse_absolute;
use crate::ScoutError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Archive URLs found by one discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResult {
    /// Absolute URLs in pre-order discovery sequence, translated to storage
    pub matched_urls: Vec<String>,
}

impl DiscoveryResult {
    pub fn is_empty(&self) -> bool {
        self.matched_urls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matched_urls.len()
    }
}

/// Artifact discovery engine
#[derive(Debug, Clone)]
pub struct Scout {
    config: Arc<DiscoveryConfig>,
    extractor: LinkExtractor,
}

impl Scout {
    /// Creates a scout, validating the configuration and building its HTTP client
    pub fn new(config: DiscoveryConfig) -> Result<Self, ScoutError> {
        validate(&config)?;
        let extractor = LinkExtractor::from_config(&config.http)?;
        Ok(Self {
            config: Arc::new(config),
            extractor,
        })
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn extractor(&self) -> &LinkExtractor {
        &self.extractor
    }

    /// Runs discovery for one entry URL
    ///
    /// # Returns
    ///
    /// * `Ok(DiscoveryResult)` - Matches in discovery order, possibly none
    /// * `Err(ScoutError)` - The entry URL is malformed, the artifacts
    ///   directory could not be located, or its page could not be fetched
    pub async fn discover(
        &self,
        entry: &str,
        sink: &dyn ProgressSink,
    ) -> Result<DiscoveryResult, ScoutError> {
        self.discover_with_cancel(entry, sink, CancellationToken::new())
            .await
    }

    /// Runs discovery, stopping at the next fetch once `cancel` fires
    pub async fn discover_with_cancel(
        &self,
        entry: &str,
        sink: &dyn ProgressSink,
        cancel: CancellationToken,
    ) -> Result<DiscoveryResult, ScoutError> {
        let session = DiscoverySession::new(&self.config, &self.extractor, sink, cancel, entry)?;
        session.run().await
    }
}

/// State of a single discovery run
pub struct DiscoverySession<'a> {
    pub(crate) config: &'a DiscoveryConfig,
    extractor: &'a LinkExtractor,
    sink: &'a dyn ProgressSink,
    cancel: CancellationToken,
    pub(crate) entry: Url,
}

impl<'a> DiscoverySession<'a> {
    pub fn new(
        config: &'a DiscoveryConfig,
        extractor: &'a LinkExtractor,
        sink: &'a dyn ProgressSink,
        cancel: CancellationToken,
        entry: &str,
    ) -> Result<Self, ScoutError> {
        let entry = parse_absolute(entry)?;
        Ok(Self {
            config,
            extractor,
            sink,
            cancel,
            entry,
        })
    }

    pub fn entry(&self) -> &Url {
        &self.entry
    }

    /// Locates the artifacts directory and crawls it
    pub async fn run(self) -> Result<DiscoveryResult, ScoutError> {
        tracing::info!("Starting discovery from {}", self.entry);

        let matched_urls = match self.locate_root().await? {
            RootLocation::DirectArchive(url) => {
                self.report(&format!("Found archive at {}", url));
                vec![url]
            }
            RootLocation::ArtifactsRoot(root) => self.crawl(&root).await?,
        };

        tracing::info!(
            "Discovery from {} finished with {} match(es)",
            self.entry,
            matched_urls.len()
        );

        Ok(DiscoveryResult { matched_urls })
    }

    pub(crate) async fn fetch(&self, url: &Url) -> Result<Vec<AnchorLink>, ScoutError> {
        self.extractor.extract_links(url, &self.cancel).await
    }

    pub(crate) fn report(&self, message: &str) {
        self.sink.report(message);
    }
}
