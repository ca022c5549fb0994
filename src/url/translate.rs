use crate::config::TranslationConfig;

/// Rewrites a browsing-frontend URL into its raw storage address
///
/// `https://gcsweb.example/gcs/bucket/x.tar` becomes
/// `https://storage.example/bucket/x.tar` when the frontend prefix is
/// `https://gcsweb.example`, the browse segment `/gcs` and the storage
/// prefix `https://storage.example`. The browse segment is optional after
/// the frontend prefix. URLs outside the frontend prefix are returned as-is,
/// which makes the rewrite idempotent.
///
/// # Examples
///
/// ```
/// use artifact_scout::config::TranslationConfig;
/// use artifact_scout::url::translate_to_storage;
///
/// let mapping = TranslationConfig {
///     frontend_prefix: "https://gcsweb.example.com".to_string(),
///     browse_path_segment: "/gcs".to_string(),
///     storage_prefix: "https://storage.example.com".to_string(),
/// };
///
/// let url = "https://gcsweb.example.com/gcs/bucket/logs/must-gather.tar";
/// assert_eq!(
///     translate_to_storage(url, &mapping),
///     "https://storage.example.com/bucket/logs/must-gather.tar"
/// );
/// assert_eq!(translate_to_storage("https://other.com/x.tar", &mapping), "https://other.com/x.tar");
/// ```
pub fn translate_to_storage(url: &str, mapping: &TranslationConfig) -> String {
    let Some(rest) = strip_frontend_prefix(url, &mapping.frontend_prefix) else {
        return url.to_string();
    };

    let rest = strip_segment(rest, &mapping.browse_path_segment).unwrap_or(rest);

    format!("{}{}", mapping.storage_prefix, rest)
}

/// Strips the frontend prefix, requiring a boundary right after it
///
/// `https://host` must not match `https://hostname/...`.
fn strip_frontend_prefix<'a>(url: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    strip_segment(url, prefix)
}

fn strip_segment<'a>(s: &'a str, segment: &str) -> Option<&'a str> {
    if segment.is_empty() {
        return None;
    }
    let rest = s.strip_prefix(segment)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') || rest.starts_with('#') {
        Some(rest)
    } else {
        None
    }
}
