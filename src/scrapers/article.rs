//! Article page extraction.
//!
//! Notification pages on job portals are hand-edited WordPress posts. The
//! layout is conventional rather than structured, so every field here comes
//! from an independent heuristic and may be empty.
//!
//! # Table positions
//!
//! Tabular sections are assigned by the position of the `table` element on
//! the page, following [`TABLE_RULES`]. A page that orders its tables
//! differently gets the wrong section in each field; this is a known
//! limitation of the heuristic and is not corrected for.

use super::{element_text, resolve_href};
use crate::models::StructuredFields;
use crate::utils::{clean_title, strip_non_content};
use html_escape::encode_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

/// Paragraphs used for "how to apply" when the page has no such section.
pub const HOW_TO_APPLY_FALLBACK_PARAGRAPHS: usize = 3;
/// Paragraphs kept when a page has no recognizable content container.
pub const MAX_FALLBACK_PARAGRAPHS: usize = 50;

const CONTENT_CONTAINERS: [&str; 5] = [
    ".entry-content",
    ".post-content",
    ".blog-content",
    "article",
    ".content",
];

static CONTAINER_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_CONTAINERS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static TABLES: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static PARAGRAPHS: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static SECTION_MARKERS: Lazy<Selector> = Lazy::new(|| Selector::parse("h2, h3, h4, strong").unwrap());
static STRONG: Lazy<Selector> = Lazy::new(|| Selector::parse("strong, b").unwrap());

/// A tabular section of a notification page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableField {
    ImportantDates,
    Vacancy,
    ApplicationFee,
    AgeLimit,
    SelectionProcess,
}

impl TableField {
    fn slot(self, fields: &mut StructuredFields) -> &mut String {
        match self {
            TableField::ImportantDates => &mut fields.important_dates,
            TableField::Vacancy => &mut fields.vacancy,
            TableField::ApplicationFee => &mut fields.application_fee,
            TableField::AgeLimit => &mut fields.age_limit,
            TableField::SelectionProcess => &mut fields.selection_process,
        }
    }
}

/// Assigns the table at `position` (0-based, top-level tables in document
/// order) to `field`.
#[derive(Debug, Clone, Copy)]
pub struct TableRule {
    pub field: TableField,
    pub position: usize,
}

pub const TABLE_RULES: [TableRule; 5] = [
    TableRule { field: TableField::ImportantDates, position: 0 },
    TableRule { field: TableField::Vacancy, position: 1 },
    TableRule { field: TableField::ApplicationFee, position: 2 },
    TableRule { field: TableField::AgeLimit, position: 3 },
    TableRule { field: TableField::SelectionProcess, position: 4 },
];

/// A link found on a notification page, recognized by its anchor text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    ApplyOnline,
    Notification,
    OfficialWebsite,
    AdmitCard,
}

impl LinkRole {
    pub const ALL: [LinkRole; 4] = [
        LinkRole::ApplyOnline,
        LinkRole::Notification,
        LinkRole::OfficialWebsite,
        LinkRole::AdmitCard,
    ];

    /// Lowercase substrings of the anchor text that select this role.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            LinkRole::ApplyOnline => &["apply"],
            LinkRole::Notification => &["notification"],
            LinkRole::OfficialWebsite => &["official", "website"],
            LinkRole::AdmitCard => &["admit"],
        }
    }

    fn slot(self, fields: &mut StructuredFields) -> &mut String {
        match self {
            LinkRole::ApplyOnline => &mut fields.apply_online_link,
            LinkRole::Notification => &mut fields.notification_link,
            LinkRole::OfficialWebsite => &mut fields.official_website_link,
            LinkRole::AdmitCard => &mut fields.admit_card_link,
        }
    }
}

/// Extract every structured section from an article page.
#[instrument(level = "info", skip(markup))]
pub fn extract_fields(markup: &str, source_url: &str) -> StructuredFields {
    let document = Html::parse_document(markup);
    let base = Url::parse(source_url).ok();

    let mut fields = StructuredFields {
        overview: primary_content(&document).unwrap_or_default(),
        how_to_apply: how_to_apply_section(&document)
            .unwrap_or_else(|| trailing_paragraphs(&document, HOW_TO_APPLY_FALLBACK_PARAGRAPHS)),
        source_url: source_url.to_string(),
        ..Default::default()
    };

    let tables = top_level_tables(&document);
    for rule in TABLE_RULES {
        if let Some(table) = tables.get(rule.position) {
            *rule.field.slot(&mut fields) = strip_non_content(&table.html());
        }
    }

    for anchor in document.select(&ANCHORS) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let link = match &base {
            Some(base) => resolve_href(base, href),
            None => Url::parse(href.trim()).ok(),
        };
        let Some(link) = link else {
            continue;
        };
        let text = element_text(&anchor).to_lowercase();
        for role in LinkRole::ALL {
            if role.keywords().iter().any(|k| text.contains(k)) {
                *role.slot(&mut fields) = link.to_string();
            }
        }
    }

    debug!(
        tables = tables.len(),
        has_overview = !fields.overview.is_empty(),
        has_apply_link = !fields.apply_online_link.is_empty(),
        "Extracted structured fields"
    );
    fields
}

/// Post body for pages processed without structured extraction.
///
/// The primary content container verbatim, else the page's paragraphs as
/// plain text, else a placeholder.
pub fn article_content(markup: &str) -> String {
    let document = Html::parse_document(markup);
    if let Some(content) = primary_content(&document) {
        return content;
    }

    let paragraphs: Vec<String> = document
        .select(&PARAGRAPHS)
        .map(|p| clean_title(&element_text(&p)))
        .filter(|text| !text.is_empty())
        .take(MAX_FALLBACK_PARAGRAPHS)
        .map(|text| format!("<p>{}</p>", encode_text(&text)))
        .collect();
    if paragraphs.is_empty() {
        "<p>Content not available</p>".to_string()
    } else {
        paragraphs.join("\n")
    }
}

/// The first recognizable content container, scripts and styles removed.
fn primary_content(document: &Html) -> Option<String> {
    CONTAINER_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())
        .map(|element| strip_non_content(&element.html()))
}

/// Tables not nested inside another table; inner tables belong to the outer
/// table's fragment.
fn top_level_tables(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .select(&TABLES)
        .filter(|table| {
            !table
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|el| el.value().name() == "table")
        })
        .collect()
}

/// Content between a "How to apply" heading and the next heading.
fn how_to_apply_section(document: &Html) -> Option<String> {
    for marker in document.select(&SECTION_MARKERS) {
        if !element_text(&marker).to_lowercase().contains("how to apply") {
            continue;
        }
        // a bold run inside a paragraph acts as a heading for that paragraph
        let block = if marker.value().name() == "strong" {
            marker
                .parent()
                .and_then(ElementRef::wrap)
                .filter(|p| p.value().name() == "p")
                .unwrap_or(marker)
        } else {
            marker
        };

        let parts: Vec<String> = block
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|sibling| !is_heading_block(sibling))
            .map(|sibling| sibling.html())
            .collect();
        if !parts.is_empty() {
            return Some(strip_non_content(&parts.join("\n")));
        }
    }
    None
}

/// Headings, and paragraphs whose whole text is bold.
fn is_heading_block(element: &ElementRef<'_>) -> bool {
    match element.value().name() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => true,
        "p" => {
            let text = clean_title(&element_text(element));
            !text.is_empty()
                && element
                    .select(&STRONG)
                    .any(|strong| clean_title(&element_text(&strong)) == text)
        }
        _ => false,
    }
}

fn trailing_paragraphs(document: &Html, count: usize) -> String {
    let paragraphs: Vec<ElementRef<'_>> = document.select(&PARAGRAPHS).collect();
    let start = paragraphs.len().saturating_sub(count);
    paragraphs[start..]
        .iter()
        .map(|p| strip_non_content(&p.html()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://www.freejobalert.com/ssc-cgl-2024/";

    fn tables(n: usize) -> String {
        (1..=n)
            .map(|i| format!("<table><tr><td>table {i}</td></tr></table>"))
            .collect()
    }

    #[test]
    fn test_three_tables_fill_first_three_fields() {
        let html = format!("<html><body><h1>SSC CGL</h1>{}</body></html>", tables(3));
        let fields = extract_fields(&html, SOURCE);

        assert!(fields.important_dates.contains("table 1"));
        assert!(fields.vacancy.contains("table 2"));
        assert!(fields.application_fee.contains("table 3"));
        assert!(fields.age_limit.is_empty());
        assert!(fields.selection_process.is_empty());
        assert_eq!(fields.source_url, SOURCE);
    }

    #[test]
    fn test_each_table_rule_maps_its_position() {
        let html = tables(6);
        let fields = extract_fields(&html, SOURCE);
        for (rule, expected) in TABLE_RULES.iter().zip(1..) {
            let mut copy = fields.clone();
            let value = rule.field.slot(&mut copy).clone();
            assert!(
                value.contains(&format!("table {expected}<")),
                "{:?} should hold table {expected}, got {value}",
                rule.field
            );
        }
    }

    #[test]
    fn test_nested_tables_count_once() {
        let html = r#"<table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>
                      <table><tr><td>second</td></tr></table>"#;
        let fields = extract_fields(html, SOURCE);
        assert!(fields.important_dates.contains("inner"));
        assert!(fields.vacancy.contains("second"));
        assert!(fields.application_fee.is_empty());
    }

    #[test]
    fn test_overview_strips_scripts() {
        let html = r#"<html><body>
            <div class="sidebar"><p>Ads</p></div>
            <div class="entry-content"><p>Staff Selection Commission</p><script>track()</script><style>p{}</style></div>
            <article><p>Other</p></article>
        </body></html>"#;
        let fields = extract_fields(html, SOURCE);
        assert!(fields.overview.starts_with(r#"<div class="entry-content">"#));
        assert!(fields.overview.contains("Staff Selection Commission"));
        assert!(!fields.overview.contains("track()"));
        assert!(!fields.overview.contains("<style>"));
    }

    #[test]
    fn test_overview_falls_back_to_article_element() {
        let html = "<article><p>Body</p></article>";
        assert_eq!(extract_fields(html, SOURCE).overview, "<article><p>Body</p></article>");
        assert_eq!(extract_fields("<p>no container</p>", SOURCE).overview, "");
    }

    #[test]
    fn test_link_roles_last_match_wins() {
        let html = r##"
            <a href="/apply-old">Apply Online (old)</a>
            <a href="https://ssc.gov.in/notice.pdf">Download Notification</a>
            <a href="https://ssc.gov.in/">Official Website</a>
            <a href="https://ssc.gov.in/apply">Apply Online</a>
            <a href="#">Admit Card</a>
        "##;
        let fields = extract_fields(html, SOURCE);
        assert_eq!(fields.apply_online_link, "https://ssc.gov.in/apply");
        assert_eq!(fields.notification_link, "https://ssc.gov.in/notice.pdf");
        assert_eq!(fields.official_website_link, "https://ssc.gov.in/");
        assert_eq!(fields.admit_card_link, "");
    }

    #[test]
    fn test_relative_links_resolved_against_source() {
        let html = r#"<a href="/admit-card-2024/">Admit Card</a>"#;
        let fields = extract_fields(html, SOURCE);
        assert_eq!(fields.admit_card_link, "https://www.freejobalert.com/admit-card-2024/");
    }

    #[test]
    fn test_how_to_apply_section() {
        let html = r#"<div>
            <p>Intro</p>
            <h3>How to Apply</h3>
            <p>Visit ssc.gov.in</p>
            <ol><li>Register</li></ol>
            <h3>Important Links</h3>
            <p>Footer</p>
        </div>"#;
        let fields = extract_fields(html, SOURCE);
        assert_eq!(fields.how_to_apply, "<p>Visit ssc.gov.in</p>\n<ol><li>Register</li></ol>");
    }

    #[test]
    fn test_how_to_apply_bold_paragraph_heading() {
        let html = r#"<div>
            <p><strong>How To Apply:</strong></p>
            <p>Apply through the portal.</p>
            <p><strong>Selection:</strong></p>
            <p>Written exam.</p>
        </div>"#;
        let fields = extract_fields(html, SOURCE);
        assert_eq!(fields.how_to_apply, "<p>Apply through the portal.</p>");
    }

    #[test]
    fn test_how_to_apply_falls_back_to_last_paragraphs() {
        let html = "<p>one</p><p>two</p><p>three</p><p>four</p>";
        let fields = extract_fields(html, SOURCE);
        assert_eq!(fields.how_to_apply, "<p>two</p>\n<p>three</p>\n<p>four</p>");
    }

    #[test]
    fn test_empty_page_yields_empty_fields() {
        let fields = extract_fields("", SOURCE);
        assert_eq!(
            fields,
            StructuredFields {
                source_url: SOURCE.to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_article_content_container() {
        let html = r#"<div class="post-content"><p>Body</p><noscript>x</noscript></div>"#;
        assert_eq!(article_content(html), r#"<div class="post-content"><p>Body</p></div>"#);
    }

    #[test]
    fn test_article_content_paragraph_fallback() {
        let html = "<div><p>Fee &amp; age</p><p>  </p><p>Last <b>date</b></p></div>";
        assert_eq!(article_content(html), "<p>Fee &amp; age</p>\n<p>Last date</p>");
        assert_eq!(article_content("<div></div>"), "<p>Content not available</p>");
    }
}
