use crate::config::types::{CrawlConfig, DiscoveryConfig, HttpConfig, TranslationConfig};
use crate::ConfigError;
use url::Url;

/// Smallest accepted per-fetch timeout
const MIN_FETCH_TIMEOUT_MS: u64 = 50;

/// Largest accepted traversal depth
const MAX_DEPTH_LIMIT: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_translation_config(&config.translation)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.target_filenames.is_empty() {
        return Err(ConfigError::Validation(
            "target_filenames cannot be empty".to_string(),
        ));
    }

    for name in &config.target_filenames {
        validate_segment("target_filenames", name)?;
    }

    for name in &config.descend_override_names {
        validate_segment("descend_override_names", name)?;
    }

    validate_segment("artifacts_dir_name", &config.artifacts_dir_name)?;

    if config.archive_suffixes.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::Validation(
            "archive_suffixes cannot contain an empty suffix".to_string(),
        ));
    }

    // An empty fragment is contained in every path and would prune the whole tree
    if config.ignored_path_fragments.iter().any(|f| f.is_empty()) {
        return Err(ConfigError::Validation(
            "ignored_path_fragments cannot contain an empty fragment".to_string(),
        ));
    }

    if config.max_depth < 1 || config.max_depth > MAX_DEPTH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and {}, got {}",
            MAX_DEPTH_LIMIT, config.max_depth
        )));
    }

    Ok(())
}

/// Validates a single path segment name
fn validate_segment(field: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot contain an empty name",
            field
        )));
    }

    if name.contains('/') {
        return Err(ConfigError::Validation(format!(
            "{} entries must be single path segments, got '{}'",
            field, name
        )));
    }

    Ok(())
}

/// Validates the frontend/storage prefix pair
fn validate_translation_config(config: &TranslationConfig) -> Result<(), ConfigError> {
    validate_prefix("frontend_prefix", &config.frontend_prefix)?;
    validate_prefix("storage_prefix", &config.storage_prefix)?;

    // Translation must be idempotent: a translated URL can never match again
    if config.storage_prefix.starts_with(&config.frontend_prefix) {
        return Err(ConfigError::Validation(format!(
            "storage_prefix '{}' must not start with frontend_prefix '{}'",
            config.storage_prefix, config.frontend_prefix
        )));
    }

    let segment = &config.browse_path_segment;
    if !segment.is_empty() && (!segment.starts_with('/') || segment.ends_with('/')) {
        return Err(ConfigError::Validation(format!(
            "browse_path_segment must be empty or look like '/gcs', got '{}'",
            segment
        )));
    }

    Ok(())
}

fn validate_prefix(field: &str, prefix: &str) -> Result<(), ConfigError> {
    let url = Url::parse(prefix)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, prefix, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field, prefix
        )));
    }

    if prefix.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must not end with '/', got '{}'",
            field, prefix
        )));
    }

    // Prefixes are matched against normalized URLs (lowercase host, no default port)
    let canonical = url.as_str().trim_end_matches('/');
    if canonical != prefix {
        return Err(ConfigError::Validation(format!(
            "{} must be written in canonical form '{}', got '{}'",
            field, canonical, prefix
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.fetch_timeout_ms < MIN_FETCH_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= {}ms, got {}ms",
            MIN_FETCH_TIMEOUT_MS, config.fetch_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}
