//! Crawler module: the artifact discovery engine
//!
//! This module contains the discovery logic:
//! - Page fetching and anchor extraction
//! - Artifacts directory resolution from an entry URL
//! - Pre-order traversal of the listing tree with pruning
//! - Per-run sessions tying it together

mod fetcher;
mod locator;
mod parser;
mod session;
mod walker;

pub use fetcher::{build_http_client, LinkExtractor};
pub use parser::{parse_anchors, AnchorLink};
pub use session::{DiscoveryResult, DiscoverySession, Scout};
pub use walker::should_descend;
