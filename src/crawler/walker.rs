//! Directory crawler
//!
//! Walks the listing tree below the artifacts directory in pre-order. The
//! traversal uses an explicit work stack: a page's anchors are classified in
//! document order and pushed in reverse, so a subdirectory's matches always
//! land before anything that follows it on the parent page.
//!
//! Termination does not rely on the listing service being well behaved:
//! every directory is fetched at most once per run, only URLs strictly
//! below the artifacts root are descended, and depth is capped by
//! `max-depth`.

use crate::config::CrawlConfig;
use crate::crawler::parser::AnchorLink;
use crate::crawler::session::DiscoverySession;
use crate::url::{dir_name, file_name, is_below, join, translate_to_storage};
use crate::ScoutError;
use std::collections::HashSet;
use url::Url;

/// Pending unit of work
#[derive(Debug)]
enum Step {
    /// Fetch a subdirectory page and classify its anchors
    Visit { url: Url, depth: u32 },
    /// Record a match
    Emit(String),
}

/// Per-crawl bookkeeping
struct Walk<'r> {
    root: &'r Url,
    visited: HashSet<String>,
    stack: Vec<Step>,
}

impl DiscoverySession<'_> {
    /// Collects every target archive below `root`, in pre-order
    ///
    /// A failure to fetch `root` itself is returned; a failure on any
    /// subdirectory only drops that subtree.
    pub(crate) async fn crawl(&self, root: &Url) -> Result<Vec<String>, ScoutError> {
        let anchors = self.fetch(root).await?;

        let mut walk = Walk {
            root,
            visited: HashSet::from([root.to_string()]),
            stack: Vec::new(),
        };
        self.plan_page(&mut walk, root, 0, &anchors);

        let mut matches = Vec::new();
        while let Some(step) = walk.stack.pop() {
            match step {
                Step::Emit(url) => {
                    tracing::info!("Found archive at {}", url);
                    self.report(&format!("Found archive at {}", url));
                    matches.push(url);
                }
                Step::Visit { url, depth } => {
                    tracing::debug!("Entering {} (depth {})", url, depth);
                    self.report(&format!("Entering {}", url));

                    match self.fetch(&url).await {
                        Ok(anchors) => self.plan_page(&mut walk, &url, depth, &anchors),
                        Err(ScoutError::Cancelled) => return Err(ScoutError::Cancelled),
                        Err(e) => {
                            tracing::warn!("Abandoning subtree {}: {}", url, e);
                            self.report(&format!("Skipping {}: {}", url, e));
                        }
                    }
                }
            }
        }

        tracing::info!(
            "Crawled {} directories under {}, {} match(es)",
            walk.visited.len(),
            root,
            matches.len()
        );

        Ok(matches)
    }

    /// Classifies a page's anchors and schedules them
    fn plan_page(&self, walk: &mut Walk<'_>, page: &Url, depth: u32, anchors: &[AnchorLink]) {
        let steps: Vec<Step> = anchors
            .iter()
            .filter_map(|anchor| self.classify(walk, page, depth, anchor))
            .collect();

        walk.stack.extend(steps.into_iter().rev());
    }

    fn classify(
        &self,
        walk: &mut Walk<'_>,
        page: &Url,
        depth: u32,
        anchor: &AnchorLink,
    ) -> Option<Step> {
        let crawl = &self.config.crawl;

        let resolved = match join(page, &anchor.href) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping unresolvable link on {}: {}", page, e);
                return None;
            }
        };

        if crawl.target_filenames.contains(file_name(&resolved)) {
            let url = translate_to_storage(resolved.as_str(), &self.config.translation);
            return Some(Step::Emit(url));
        }

        if !anchor.is_directory() {
            return None;
        }

        // Parent links and links leaving the artifacts tree
        if !is_below(walk.root, &resolved) {
            tracing::trace!("Not descending outside of {}: {}", walk.root, resolved);
            return None;
        }

        if !should_descend(crawl, &resolved) {
            tracing::debug!("Pruning {}", resolved);
            self.report(&format!("Pruning {}", resolved));
            return None;
        }

        if depth >= crawl.max_depth {
            tracing::warn!(
                "Not descending into {}: max depth {} reached",
                resolved,
                crawl.max_depth
            );
            self.report(&format!("Skipping {}: too deep", resolved));
            return None;
        }

        if !walk.visited.insert(resolved.to_string()) {
            tracing::debug!("Already visited {}", resolved);
            return None;
        }

        Some(Step::Visit {
            url: resolved,
            depth: depth + 1,
        })
    }
}

/// Decides whether a subdirectory is traversed
///
/// A directory whose exact name is in `descend-override-names` is always
/// descended; otherwise any ignored fragment in its path prunes it.
pub fn should_descend(crawl: &CrawlConfig, dir: &Url) -> bool {
    if crawl.descend_override_names.contains(dir_name(dir)) {
        return true;
    }

    let path = dir.path();
    !crawl
        .ignored_path_fragments
        .iter()
        .any(|fragment| path.contains(fragment.as_str()))
}
