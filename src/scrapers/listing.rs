//! Candidate discovery on listing and category pages.
//!
//! Job portals rarely share markup, so each [`Strategy`] is an ordered chain
//! of heuristics. A later stage runs only when the earlier one came up short.
//! Results are deduplicated on (normalized title, link) in document order and
//! capped to the configured item count.

use super::{element_text, resolve_href};
use crate::models::{CandidateItem, Source, Strategy};
use crate::utils::{clean_title, humanize_slug};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

/// Headings examined by the first `headings` stage.
pub const MAX_HEADINGS: usize = 50;
/// Fewer heading results than this triggers the anchor scan.
pub const MIN_HEADING_RESULTS: usize = 5;

const READ_MORE_MARKERS: [&str; 2] = ["details", "read more"];
const PATH_MARKERS: [&str; 4] = ["/blog/", "/news/", "/career", "/jobs"];
const ROW_ELEMENTS: [&str; 2] = ["tr", "li"];
/// Column headers whose cells never name the posting.
const NON_TITLE_COLUMNS: [&str; 5] = ["date", "qualification", "eligibility", "advt", "advertisement"];
/// Table cells joined into a read-more title (board, post name).
const TITLE_CELLS: usize = 2;

static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3").unwrap());
static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());

static DATE_CELL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d{1,2}[./-]\d{1,2}[./-]\d{2,4}|\d{1,2}(st|nd|rd|th)?[\s./-]*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?[\s,./-]*\d{2,4})$",
    )
    .unwrap()
});
static EMBEDDED_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b").unwrap());
static ADVERT_CELL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(advt|adv|advertisement)\b").unwrap());

/// Extract up to `limit` candidates from a listing page.
#[instrument(level = "info", skip(markup, source), fields(url = %source.url, strategy = ?source.strategy))]
pub fn extract_candidates(markup: &str, source: &Source, limit: usize) -> Vec<CandidateItem> {
    let document = Html::parse_document(markup);

    let found = match source.strategy {
        Strategy::Headings => {
            let mut found = heading_links(&document, source);
            if found.len() < MIN_HEADING_RESULTS {
                debug!(
                    heading_results = found.len(),
                    "Too few heading links; scanning all same-domain anchors"
                );
                found.extend(domain_anchors(&document, source));
            }
            found
        }
        Strategy::ReadMore => {
            let found = read_more_links(&document, source);
            if found.is_empty() {
                debug!("No read-more anchors; scanning for article-like paths");
                article_like_links(&document, source)
            } else {
                found
            }
        }
        Strategy::PathMarkers => path_marker_links(&document, source),
    };

    let candidates: Vec<CandidateItem> = found
        .into_iter()
        .unique_by(|c| (c.dedup_key(), c.link.clone()))
        .take(limit)
        .collect();
    debug!(count = candidates.len(), "Extracted candidates");
    candidates
}

/// Stage 1: the first same-domain link inside each `h2`/`h3`.
fn heading_links(document: &Html, source: &Source) -> Vec<CandidateItem> {
    document
        .select(&HEADINGS)
        .take(MAX_HEADINGS)
        .filter_map(|heading| {
            let link = heading
                .select(&ANCHORS)
                .filter_map(|a| resolve_href(&source.url, a.value().attr("href")?))
                .find(|link| source.owns(link))?;
            CandidateItem::new(&element_text(&heading), link, source)
        })
        .collect()
}

/// Stage 2: every absolute same-domain anchor on the page.
fn domain_anchors(document: &Html, source: &Source) -> Vec<CandidateItem> {
    document
        .select(&ANCHORS)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            let link = Url::parse(href).ok()?;
            if !source.owns(&link) || is_index_link(&link, source) {
                return None;
            }
            CandidateItem::new(&text_or(&a, href), link, source)
        })
        .collect()
}

/// Stage 3: anchors labelled with a "details" / "read more" marker.
///
/// The marker itself is not a title, so the title comes from the enclosing
/// table row or list item, or failing that from the link slug.
fn read_more_links(document: &Html, source: &Source) -> Vec<CandidateItem> {
    document
        .select(&ANCHORS)
        .filter_map(|a| {
            let text = clean_title(&element_text(&a));
            let lower = text.to_lowercase();
            if !READ_MORE_MARKERS.iter().any(|m| lower.contains(m)) {
                return None;
            }
            let link = resolve_href(&source.url, a.value().attr("href")?)?;
            let title = row_title(&a, &text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| humanize_slug(&link));
            CandidateItem::new(&title, link, source)
        })
        .collect()
}

/// Stage 3 fallback: same-domain links whose path looks like an article slug.
fn article_like_links(document: &Html, source: &Source) -> Vec<CandidateItem> {
    document
        .select(&ANCHORS)
        .filter_map(|a| {
            let link = resolve_href(&source.url, a.value().attr("href")?)?;
            if !source.owns(&link) || link.path().matches('-').count() < 2 {
                return None;
            }
            let text = clean_title(&element_text(&a));
            let title = if text.is_empty() { humanize_slug(&link) } else { text };
            CandidateItem::new(&title, link, source)
        })
        .collect()
}

fn path_marker_links(document: &Html, source: &Source) -> Vec<CandidateItem> {
    document
        .select(&ANCHORS)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let link = resolve_href(&source.url, href)?;
            if !source.owns(&link)
                || is_index_link(&link, source)
                || !PATH_MARKERS.iter().any(|m| link.path().contains(m))
            {
                return None;
            }
            CandidateItem::new(&text_or(&a, link.as_str()), link, source)
        })
        .collect()
}

/// Title for a marker anchor, taken from its enclosing table row or list item.
///
/// In a table row only the title cells count: the anchor's own cell, cells
/// under a date/qualification/advert column header, and cells whose value is
/// a date, an advert number or a bare serial number are dropped, and at most
/// [`TITLE_CELLS`] of the rest are joined. Last dates get extended on live
/// listings, so they must not leak into the title. A list item keeps its
/// text with the marker and any embedded dates removed.
fn row_title(anchor: &ElementRef<'_>, label: &str) -> Option<String> {
    let row = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| ROW_ELEMENTS.contains(&el.value().name()))?;

    if row.value().name() == "li" {
        let text = clean_title(&element_text(&row)).replace(label, " ");
        return Some(clean_title(&EMBEDDED_DATE.replace_all(&text, " ")));
    }

    let headers = column_headers(&row);
    let title = row_cells(row)
        .enumerate()
        .filter(|(_, cell)| !anchor.ancestors().any(|node| node.id() == cell.id()))
        .filter(|(i, _)| {
            headers
                .get(*i)
                .is_none_or(|h| !NON_TITLE_COLUMNS.iter().any(|m| h.contains(m)))
        })
        .map(|(_, cell)| clean_title(&element_text(&cell)))
        .filter(|text| is_title_cell(text))
        .take(TITLE_CELLS)
        .join(" ");
    Some(title)
}

/// Direct `td`/`th` children of a table row.
fn row_cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
}

/// Lowercased labels of the first all-`th` row of the row's table, if any.
fn column_headers(row: &ElementRef<'_>) -> Vec<String> {
    let Some(table) = row
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
    else {
        return Vec::new();
    };
    table
        .select(&ROWS)
        .map(|tr| row_cells(tr).collect::<Vec<_>>())
        .find(|cells| !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th"))
        .map(|cells| {
            cells
                .iter()
                .map(|c| clean_title(&element_text(c)).to_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

fn is_title_cell(text: &str) -> bool {
    if text.is_empty() || text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }
    let advert_code = !text.contains(char::is_whitespace)
        && text.contains('/')
        && text.chars().any(|c| c.is_ascii_digit());
    !(advert_code || DATE_CELL.is_match(text) || ADVERT_CELL.is_match(text))
}

/// The anchor's text, or `fallback` when the anchor has none.
fn text_or(anchor: &ElementRef<'_>, fallback: &str) -> String {
    let text = clean_title(&element_text(anchor));
    if text.is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// Links back to the listing page itself or the site root are navigation.
fn is_index_link(link: &Url, source: &Source) -> bool {
    link.path() == "/" || link.path() == source.url.path()
}
