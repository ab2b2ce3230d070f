//! HTML extraction for listing and article pages.
//!
//! Extraction runs in two phases, mirroring how job-notification sites are
//! laid out:
//!
//! 1. **Listing**: discover candidate (title, link) pairs on a category page
//! 2. **Article**: pull the post body and structured sections from one
//!    notification page
//!
//! # Strategies
//!
//! | Strategy | Module | First pass | Fallback |
//! |----------|--------|------------|----------|
//! | `headings` | [`listing`] | `h2`/`h3` with same-domain link | all absolute same-domain anchors |
//! | `read_more` | [`listing`] | "details" / "read more" anchors | same-domain article-like slugs |
//! | `path_markers` | [`listing`] | same-domain anchors under `/blog/`, `/news/`, `/career`, `/jobs` | none |
//!
//! Every heuristic is best-effort: a miss is an empty result, never an error.

pub mod article;
pub mod listing;

use scraper::ElementRef;
use url::Url;

/// Visible text of an element, text nodes joined by spaces.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Resolve an `href` against the page URL.
///
/// Script, mail, phone and bare fragment links are ignored, as is anything
/// that is not http(s) after resolution. The fragment is dropped so
/// `/post#comments` and `/post` are the same link.
pub(crate) fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    let lower = href.to_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
    {
        return None;
    }
    let mut link = base.join(href).ok()?;
    if !matches!(link.scheme(), "http" | "https") {
        return None;
    }
    link.set_fragment(None);
    Some(link)
}
