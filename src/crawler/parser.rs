//! HTML parser for directory-listing pages
//!
//! Listing pages represent every file and subdirectory as an `<a>` element.
//! Parsing goes through html5ever (via `scraper`), which recovers from
//! malformed markup instead of failing, so extraction is always best-effort.

use scraper::{Html, Selector};

/// One anchor on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorLink {
    /// Display text with whitespace collapsed
    pub text: String,

    /// Raw `href` attribute, not yet resolved
    pub href: String,
}

impl AnchorLink {
    pub fn new(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: href.into(),
        }
    }

    /// Whether the href denotes a subdirectory
    pub fn is_directory(&self) -> bool {
        self.href.ends_with('/')
    }
}

/// Extracts all anchors from an HTML document, in document order
///
/// # Skipped anchors
///
/// - empty hrefs
/// - fragment-only hrefs (same page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs
///
/// # Example
///
/// ```
/// use artifact_scout::crawler::parse_anchors;
///
/// let html = r#"<ul><li><a href="e2e/">e2e/</a></li><li><a href="build-log.txt">build-log.txt</a></li></ul>"#;
/// let anchors = parse_anchors(html);
/// assert_eq!(anchors.len(), 2);
/// assert_eq!(anchors[0].href, "e2e/");
/// ```
pub fn parse_anchors(html: &str) -> Vec<AnchorLink> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if !is_followable(href) {
                return None;
            }

            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");

            Some(AnchorLink::new(text, href))
        })
        .collect()
}

fn is_followable(href: &str) -> bool {
    !(href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:"))
}
