use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// Frontend host that serves browsable listings of the CI bucket
pub const DEFAULT_FRONTEND_PREFIX: &str = "https://gcsweb-ci.apps.ci.l2s4.p1.openshiftapps.com";

/// Raw storage address space behind the frontend
pub const DEFAULT_STORAGE_PREFIX: &str = "https://storage.googleapis.com";

/// Main configuration structure for a discovery engine
///
/// Built once, then shared read-only by every discovery run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

impl DiscoveryConfig {
    /// Per-request timeout applied to every page fetch
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.http.fetch_timeout_ms)
    }
}

/// What to look for and which parts of the tree to skip
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Exact file names that count as a match
    #[serde(rename = "target-filenames", default = "default_target_filenames")]
    pub target_filenames: BTreeSet<String>,

    /// Suffixes that mark an entry URL as a direct archive link
    #[serde(rename = "archive-suffixes", default = "default_archive_suffixes")]
    pub archive_suffixes: BTreeSet<String>,

    /// Name of the directory that roots the traversal
    #[serde(rename = "artifacts-dir-name", default = "default_artifacts_dir_name")]
    pub artifacts_dir_name: String,

    /// Anchor texts (case-insensitive) that point at the job's artifacts summary page
    #[serde(rename = "summary-link-texts", default = "default_summary_link_texts")]
    pub summary_link_texts: BTreeSet<String>,

    /// A subdirectory whose path contains one of these is not descended
    #[serde(
        rename = "ignored-path-fragments",
        default = "default_ignored_path_fragments"
    )]
    pub ignored_path_fragments: BTreeSet<String>,

    /// Directory names that are always descended, even when ignored
    #[serde(
        rename = "descend-override-names",
        default = "default_descend_override_names"
    )]
    pub descend_override_names: BTreeSet<String>,

    /// Maximum directory depth below the artifacts root
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            target_filenames: default_target_filenames(),
            archive_suffixes: default_archive_suffixes(),
            artifacts_dir_name: default_artifacts_dir_name(),
            summary_link_texts: default_summary_link_texts(),
            ignored_path_fragments: default_ignored_path_fragments(),
            descend_override_names: default_descend_override_names(),
            max_depth: default_max_depth(),
        }
    }
}

/// Browsing frontend to raw storage address mapping
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    #[serde(rename = "frontend-prefix", default = "default_frontend_prefix")]
    pub frontend_prefix: String,

    /// Path segment the frontend puts in front of bucket paths
    #[serde(rename = "browse-path-segment", default = "default_browse_path_segment")]
    pub browse_path_segment: String,

    #[serde(rename = "storage-prefix", default = "default_storage_prefix")]
    pub storage_prefix: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            frontend_prefix: default_frontend_prefix(),
            browse_path_segment: default_browse_path_segment(),
            storage_prefix: default_storage_prefix(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn strings(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_target_filenames() -> BTreeSet<String> {
    strings(&["must-gather.tar"])
}

fn default_archive_suffixes() -> BTreeSet<String> {
    strings(&[".tar", ".tar.gz", ".tgz"])
}

fn default_artifacts_dir_name() -> String {
    "artifacts".to_string()
}

fn default_summary_link_texts() -> BTreeSet<String> {
    strings(&["artifacts"])
}

fn default_ignored_path_fragments() -> BTreeSet<String> {
    strings(&[
        "/namespaces/",
        "/cluster-scoped-resources/",
        "/nodes/",
        "/pods/",
        "/gather-extra/",
        "/gather-audit-logs/",
    ])
}

fn default_descend_override_names() -> BTreeSet<String> {
    strings(&["gather-must-gather"])
}

fn default_max_depth() -> u32 {
    16
}

fn default_frontend_prefix() -> String {
    DEFAULT_FRONTEND_PREFIX.to_string()
}

fn default_browse_path_segment() -> String {
    "/gcs".to_string()
}

fn default_storage_prefix() -> String {
    DEFAULT_STORAGE_PREFIX.to_string()
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("artifact-scout/{}", env!("CARGO_PKG_VERSION"))
}
