//! Artifacts directory resolution
//!
//! Finds the directory a crawl starts from. The entry URL is either a direct
//! archive link (no fetch needed), a page linking to the artifacts
//! directory, or a job-summary page whose "Artifacts" link leads to such a
//! page one hop further.

use crate::crawler::parser::AnchorLink;
use crate::crawler::session::DiscoverySession;
use crate::url::{file_name, join, last_segment, translate_to_storage};
use crate::ScoutError;
use std::collections::BTreeSet;
use url::Url;

/// Number of summary-link hops followed before giving up
const SUMMARY_HOPS: u32 = 1;

/// Outcome of root resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RootLocation {
    /// The entry URL already names an archive (translated to storage)
    DirectArchive(String),
    /// The artifacts directory to crawl
    ArtifactsRoot(Url),
}

impl DiscoverySession<'_> {
    pub(crate) async fn locate_root(&self) -> Result<RootLocation, ScoutError> {
        let crawl = &self.config.crawl;

        self.report(&format!("Resolving artifacts directory from {}", self.entry));

        if is_archive_link(&self.entry, &crawl.archive_suffixes) {
            tracing::debug!("{} is a direct archive link", self.entry);
            let url = translate_to_storage(self.entry.as_str(), &self.config.translation);
            return Ok(RootLocation::DirectArchive(url));
        }

        let mut page = self.entry.clone();
        let mut hops_left = SUMMARY_HOPS;

        loop {
            let anchors = self.fetch(&page).await?;

            if let Some(anchor) = find_artifacts_anchor(&anchors, &crawl.artifacts_dir_name) {
                let mut root = join(&page, &anchor.href)?;
                ensure_directory(&mut root);
                self.report(&format!("Found artifacts directory at {}", root));
                return Ok(RootLocation::ArtifactsRoot(root));
            }

            match find_summary_anchor(&anchors, &crawl.summary_link_texts) {
                Some(anchor) if hops_left > 0 => {
                    hops_left -= 1;
                    page = join(&page, &anchor.href)?;
                    self.report(&format!("Following artifacts link to {}", page));
                }
                _ => {
                    return Err(ScoutError::NotFound {
                        what: "artifacts directory".to_string(),
                        url: page.to_string(),
                    })
                }
            }
        }
    }
}

/// Whether the URL's last path segment ends with an archive suffix
pub(crate) fn is_archive_link(url: &Url, suffixes: &BTreeSet<String>) -> bool {
    let name = file_name(url);
    !name.is_empty() && suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
}

/// First anchor whose href ends with the artifacts directory segment
fn find_artifacts_anchor<'a>(anchors: &'a [AnchorLink], dir_name: &str) -> Option<&'a AnchorLink> {
    anchors
        .iter()
        .find(|anchor| last_segment(href_path(&anchor.href)) == dir_name)
}

/// First anchor whose text names the job's artifacts summary page
fn find_summary_anchor<'a>(
    anchors: &'a [AnchorLink],
    texts: &BTreeSet<String>,
) -> Option<&'a AnchorLink> {
    anchors.iter().find(|anchor| {
        texts
            .iter()
            .any(|text| anchor.text.trim().eq_ignore_ascii_case(text.trim()))
    })
}

/// The href without its query or fragment
fn href_path(href: &str) -> &str {
    href.split(['?', '#']).next().unwrap_or(href)
}

/// Listing pages resolve children against the directory, so keep the trailing slash
///
/// Any query or fragment carried by the artifacts link is dropped.
fn ensure_directory(url: &mut Url) {
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
}
