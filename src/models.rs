//! Data models for sources, scraped candidates and publish results.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Source`] and [`Strategy`]: what to poll and how to read it
//! - [`CandidateItem`]: a tentative (title, link) pair from a listing page
//! - [`StructuredFields`]: best-effort sections of an article page
//! - [`PublishedEntry`], [`ItemOutcome`], [`RunResult`]: publish bookkeeping

use crate::utils::{clean_title, normalize_title};
use serde::{Deserialize, Serialize};
use url::Url;

/// Maximum title length sent to WordPress, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// How candidate links are discovered on a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `h2`/`h3` headings with an embedded same-domain link, falling back to
    /// every absolute same-domain anchor.
    Headings,
    /// Anchors labelled "details" / "read more", falling back to same-domain
    /// anchors whose path looks like an article slug.
    ReadMore,
    /// Same-domain anchors whose path contains a known section marker.
    PathMarkers,
}

/// A listing page to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Human readable site name, used in logs and in the post footer.
    pub site_name: String,
    pub url: Url,
    pub strategy: Strategy,
}

impl Source {
    /// The host links must point at to count as coming from this source.
    ///
    /// A leading `www.` is dropped so `www.example.com` and `example.com`
    /// share a domain.
    pub fn domain(&self) -> String {
        let host = self.url.host_str().unwrap_or_default().to_lowercase();
        host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
    }

    /// True when `link` is hosted on this source's domain or a subdomain of it.
    pub fn owns(&self, link: &Url) -> bool {
        let domain = self.domain();
        match link.host_str() {
            Some(host) => {
                let host = host.to_lowercase();
                host == domain || host.ends_with(&format!(".{domain}"))
            }
            None => false,
        }
    }
}

/// A (title, link) pair discovered on a listing page.
///
/// The title is cleaned (whitespace collapsed, trimmed) and truncated to
/// [`MAX_TITLE_CHARS`] on construction, so the same string is used for the
/// duplicate check and for the published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateItem {
    pub title: String,
    pub link: Url,
    pub origin: Source,
}

impl CandidateItem {
    /// Build a candidate, refusing titles that are empty after cleaning.
    pub fn new(title: &str, link: Url, origin: &Source) -> Option<Self> {
        let cleaned = clean_title(title);
        if cleaned.is_empty() {
            return None;
        }
        let title = cleaned.chars().take(MAX_TITLE_CHARS).collect::<String>();
        Some(Self {
            title: title.trim_end().to_string(),
            link,
            origin: origin.clone(),
        })
    }

    /// Key used for duplicate detection.
    pub fn dedup_key(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Sections extracted from a single article page.
///
/// Every field is a raw HTML fragment or URL, or empty when the heuristic
/// found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredFields {
    pub overview: String,
    pub important_dates: String,
    pub vacancy: String,
    pub application_fee: String,
    pub age_limit: String,
    pub selection_process: String,
    pub how_to_apply: String,
    pub apply_online_link: String,
    pub notification_link: String,
    pub official_website_link: String,
    pub admit_card_link: String,
    pub source_url: String,
}

/// What WordPress returned after a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublishedEntry {
    pub id: u64,
    pub link: String,
}

/// Final state of one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Published(PublishedEntry),
    Skipped,
    Failed(String),
}

/// Counters for one execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunResult {
    pub items_considered: usize,
    pub items_skipped_duplicate: usize,
    pub items_published: usize,
    pub items_failed: usize,
    /// Sources whose listing page could not be fetched.
    pub sources_failed: usize,
}

impl RunResult {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.items_considered += 1;
        match outcome {
            ItemOutcome::Published(_) => self.items_published += 1,
            ItemOutcome::Skipped => self.items_skipped_duplicate += 1,
            ItemOutcome::Failed(_) => self.items_failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str) -> Source {
        Source {
            site_name: "Test".to_string(),
            url: Url::parse(url).unwrap(),
            strategy: Strategy::Headings,
        }
    }

    #[test]
    fn test_domain_strips_www() {
        assert_eq!(source("https://www.freejobalert.com/ssc-jobs/").domain(), "freejobalert.com");
        assert_eq!(source("https://sarkariresult.com.im/").domain(), "sarkariresult.com.im");
    }

    #[test]
    fn test_owns_matches_subdomains_only() {
        let s = source("https://www.example.com/");
        assert!(s.owns(&Url::parse("https://example.com/a").unwrap()));
        assert!(s.owns(&Url::parse("https://jobs.example.com/a").unwrap()));
        assert!(!s.owns(&Url::parse("https://notexample.com/a").unwrap()));
        assert!(!s.owns(&Url::parse("https://example.com.evil.net/a").unwrap()));
    }

    #[test]
    fn test_candidate_rejects_blank_title() {
        let s = source("https://example.com/");
        let link = Url::parse("https://example.com/post").unwrap();
        assert!(CandidateItem::new("", link.clone(), &s).is_none());
        assert!(CandidateItem::new(" \n\t ", link, &s).is_none());
    }

    #[test]
    fn test_candidate_truncates_long_title() {
        let s = source("https://example.com/");
        let link = Url::parse("https://example.com/post").unwrap();
        let item = CandidateItem::new(&"x".repeat(250), link, &s).unwrap();
        assert_eq!(item.title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_dedup_key_ignores_case_and_padding() {
        let s = source("https://example.com/");
        let link = Url::parse("https://example.com/post").unwrap();
        let a = CandidateItem::new("SSC CGL 2024", link.clone(), &s).unwrap();
        let b = CandidateItem::new("  ssc cgl 2024 ", link, &s).unwrap();
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_run_result_record() {
        let mut result = RunResult::default();
        result.record(&ItemOutcome::Skipped);
        result.record(&ItemOutcome::Failed("boom".to_string()));
        result.record(&ItemOutcome::Published(PublishedEntry {
            id: 7,
            link: "https://example.com/?p=7".to_string(),
        }));
        assert_eq!(result.items_considered, 3);
        assert_eq!(result.items_skipped_duplicate, 1);
        assert_eq!(result.items_failed, 1);
        assert_eq!(result.items_published, 1);
    }

    #[test]
    fn test_strategy_deserializes_snake_case() {
        let s: Strategy = serde_yaml::from_str("read_more").unwrap();
        assert_eq!(s, Strategy::ReadMore);
        let s: Strategy = serde_yaml::from_str("path_markers").unwrap();
        assert_eq!(s, Strategy::PathMarkers);
    }

    #[test]
    fn test_structured_fields_serialize_all_keys() {
        let fields = StructuredFields {
            vacancy: "<table></table>".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["vacancy"], "<table></table>");
        assert_eq!(json["age_limit"], "");
        assert_eq!(json.as_object().unwrap().len(), 12);
    }
}
