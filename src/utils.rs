//! Utility functions for title handling, markup cleanup and logging.
//!
//! This module provides helper functions used throughout the application:
//! - Title cleaning and normalization for duplicate detection
//! - Script/style stripping for verbatim HTML fragments
//! - String truncation for log output

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

static NON_CONTENT_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>")
        .unwrap()
});

/// Collapse whitespace runs to single spaces and trim.
///
/// Headings and anchors on listing pages often wrap over several lines; the
/// cleaned form is what gets published.
pub fn clean_title(raw: &str) -> String {
    WHITESPACE.replace_all(raw, " ").trim().to_string()
}

/// Key used to decide whether two titles name the same posting.
///
/// Leading/trailing whitespace and letter case are ignored. WordPress renders
/// titles through `wptexturize`, so curly quotes, primes, en/em dashes, the
/// ellipsis character and `×` are folded back to the ASCII the scraper sees,
/// and runs of hyphens collapse to one.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_title("  ssc cgl 2024 "), normalize_title("SSC CGL 2024"));
/// assert_eq!(normalize_title("Officer\u{2019}s Post"), normalize_title("Officer's Post"));
/// ```
pub fn normalize_title(title: &str) -> String {
    let mut folded = String::with_capacity(title.len());
    for c in title.trim().chars() {
        match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => folded.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => folded.push('"'),
            '\u{2013}' | '\u{2014}' => folded.push('-'),
            '\u{2026}' => folded.push_str("..."),
            '\u{00D7}' => folded.push('x'),
            '\u{00A0}' => folded.push(' '),
            _ => folded.push(c),
        }
    }
    HYPHEN_RUNS.replace_all(&folded, "-").to_lowercase()
}

/// Plain text of an HTML fragment, with entities decoded.
///
/// WordPress returns `title.rendered` as HTML, so `Tom &amp; Jerry` has to be
/// decoded before it can be compared with a scraped title.
pub fn html_to_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    parsed.root_element().text().collect::<String>()
}

/// Remove `script`, `style` and `noscript` elements from raw markup.
pub fn strip_non_content(html: &str) -> String {
    NON_CONTENT_BLOCKS.replace_all(html, "").into_owned()
}

/// Turn the last path segment of a link into a readable title.
///
/// `https://x.com/ssc-cgl-2024-notification/` becomes
/// `ssc cgl 2024 notification`. Returns an empty string when the path has no
/// usable segment.
pub fn humanize_slug(link: &url::Url) -> String {
    let segment = link
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .unwrap_or_default();
    let segment = segment
        .trim_end_matches(".html")
        .trim_end_matches(".htm")
        .trim_end_matches(".php");
    clean_title(&segment.replace(['-', '_'], " "))
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
