//! HTML bodies for WordPress posts.
//!
//! Structured posts are laid out as the familiar job-portal page: overview,
//! one headed section per table, "How to apply", an important-links table
//! and a source footer. Sections with no content are left out.

use crate::models::StructuredFields;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

const PLACEHOLDER: &str = "<p>Content not available</p>";

/// Render a post body from structured fields.
///
/// A tabular fragment that already appears inside the overview is not
/// repeated under its own heading.
pub fn render_structured(fields: &StructuredFields, site_name: &str) -> String {
    let mut html = String::new();

    if !fields.overview.is_empty() {
        writeln!(html, "{}", fields.overview).unwrap();
    }

    let sections = [
        ("Important Dates", &fields.important_dates),
        ("Vacancy Details", &fields.vacancy),
        ("Application Fee", &fields.application_fee),
        ("Age Limit", &fields.age_limit),
        ("Selection Process", &fields.selection_process),
        ("How to Apply", &fields.how_to_apply),
    ];
    for (heading, fragment) in sections {
        if fragment.is_empty() || fields.overview.contains(fragment.as_str()) {
            continue;
        }
        writeln!(html, "<h2>{heading}</h2>\n{fragment}").unwrap();
    }

    let links = [
        ("Apply Online", &fields.apply_online_link),
        ("Download Notification", &fields.notification_link),
        ("Official Website", &fields.official_website_link),
        ("Admit Card", &fields.admit_card_link),
    ];
    if links.iter().any(|(_, href)| !href.is_empty()) {
        writeln!(html, "<h2>Important Links</h2>\n<table>\n<tbody>").unwrap();
        for (label, href) in links.iter().filter(|(_, href)| !href.is_empty()) {
            writeln!(
                html,
                r#"<tr><td>{label}</td><td><a href="{}" target="_blank" rel="noopener">Click Here</a></td></tr>"#,
                encode_double_quoted_attribute(href)
            )
            .unwrap();
        }
        writeln!(html, "</tbody>\n</table>").unwrap();
    }

    if html.is_empty() {
        html.push_str(PLACEHOLDER);
        html.push('\n');
    }
    with_source_footer(html.trim_end(), site_name)
}

/// Append the source attribution footer to a post body.
pub fn with_source_footer(content: &str, site_name: &str) -> String {
    format!(
        "{content}\n\n<hr/>\n<p><strong>Source:</strong> {}</p>",
        encode_text(site_name)
    )
}
