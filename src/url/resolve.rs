use crate::{UrlError, UrlResult};
use url::Url;

/// Parses an absolute http(s) URL
///
/// # Examples
///
/// ```
/// use artifact_scout::url::parse_absolute;
///
/// assert!(parse_absolute("https://example.com/logs/").is_ok());
/// assert!(parse_absolute("/logs/").is_err());
/// assert!(parse_absolute("ftp://example.com/logs/").is_err());
/// ```
pub fn parse_absolute(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|source| UrlError::Parse {
        input: input.to_string(),
        source,
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

/// Resolves a relative or absolute reference against a base URL
///
/// Standard URL resolution: `"b/"` against `https://h/a/` is `https://h/a/b/`,
/// `"/c/"` replaces the whole path, and an absolute reference replaces
/// everything.
///
/// # Examples
///
/// ```
/// use artifact_scout::url::resolve;
///
/// let url = resolve("https://example.com/logs/job/", "artifacts/").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/logs/job/artifacts/");
/// ```
pub fn resolve(base: &str, reference: &str) -> UrlResult<Url> {
    let base = parse_absolute(base)?;
    join(&base, reference)
}

/// Resolves a reference against an already parsed base URL
pub fn join(base: &Url, reference: &str) -> UrlResult<Url> {
    base.join(reference.trim()).map_err(|source| UrlError::Parse {
        input: reference.to_string(),
        source,
    })
}

/// Returns the file name of a URL: the part of the path after the last `/`
///
/// Directory URLs (path ending in `/`) have an empty file name.
pub fn file_name(url: &Url) -> &str {
    let path = url.path();
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Returns the last non-empty path segment, ignoring a trailing `/`
pub fn dir_name(url: &Url) -> &str {
    last_segment(url.path())
}

/// Returns the last non-empty `/`-separated segment of a path or href
pub fn last_segment(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// Whether `url` lies strictly below the directory `root`
///
/// Only the origin and path are compared; queries and fragments are ignored.
pub fn is_below(root: &Url, url: &Url) -> bool {
    url.origin() == root.origin()
        && url.path().len() > root.path().len()
        && url.path().starts_with(root.path())
}
