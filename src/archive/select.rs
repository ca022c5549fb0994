use crate::crawler::DiscoveryResult;
use crate::ScoutError;

/// What the caller should do with a discovery result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Exactly one archive: proceed with it
    Single(String),
    /// Several archives: the user has to choose
    Multiple(Vec<String>),
}

impl Selection {
    /// Picks one candidate by 1-based index
    pub fn pick(&self, choice: usize) -> Option<&str> {
        match self {
            Selection::Single(url) => (choice == 1).then_some(url.as_str()),
            Selection::Multiple(urls) => choice
                .checked_sub(1)
                .and_then(|idx| urls.get(idx))
                .map(String::as_str),
        }
    }

    pub fn candidates(&self) -> &[String] {
        match self {
            Selection::Single(url) => std::slice::from_ref(url),
            Selection::Multiple(urls) => urls,
        }
    }
}

/// Interprets a discovery result for the caller
///
/// An empty result is the one outcome the engine itself does not treat as an
/// error; here it becomes `EmptyResult`.
///
/// # Examples
///
/// ```
/// use artifact_scout::{select, DiscoveryResult, Selection};
///
/// let result = DiscoveryResult { matched_urls: vec!["https://s/a/must-gather.tar".to_string()] };
/// assert_eq!(
///     select("https://prow/job/1", result).unwrap(),
///     Selection::Single("https://s/a/must-gather.tar".to_string())
/// );
/// ```
pub fn select(entry: &str, result: DiscoveryResult) -> Result<Selection, ScoutError> {
    let mut urls = result.matched_urls;
    match urls.len() {
        0 => Err(ScoutError::EmptyResult {
            url: entry.to_string(),
        }),
        1 => Ok(Selection::Single(urls.remove(0))),
        _ => Ok(Selection::Multiple(urls)),
    }
}
