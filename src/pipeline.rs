//! Scrape → extract → deduplicate → publish orchestration.
//!
//! Sources are processed one after another and each candidate runs through
//!
//! ```text
//! Discovered → Checked → Skipped | Published | Failed
//! ```
//!
//! Every failure below the source level becomes an [`ItemOutcome::Failed`]
//! for that item only; the run always continues with the next item. The only
//! state shared across items is the [`RunResult`] counters.

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::models::{CandidateItem, ItemOutcome, RunResult, Source};
use crate::outputs::post::{render_structured, with_source_footer};
use crate::scrapers::article::{article_content, extract_fields};
use crate::scrapers::listing::extract_candidates;
use crate::wordpress::WpClient;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// One configured run of the poster.
#[derive(Debug)]
pub struct Pipeline {
    config: Config,
    fetcher: Fetcher,
    wordpress: WpClient,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let fetcher = Fetcher::new(&config.fetch)?;
        let wordpress = WpClient::new(config.wordpress.clone())?;
        Ok(Self {
            config,
            fetcher,
            wordpress,
        })
    }

    /// Process every configured source and return the run's counters.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> RunResult {
        let mut result = RunResult::default();
        for source in &self.config.sources {
            self.process_source(source, &mut result).await;
        }

        info!(
            considered = result.items_considered,
            published = result.items_published,
            skipped = result.items_skipped_duplicate,
            failed = result.items_failed,
            sources_failed = result.sources_failed,
            "Run summary"
        );
        result
    }

    #[instrument(level = "info", skip_all, fields(site = %source.site_name, url = %source.url))]
    async fn process_source(&self, source: &Source, result: &mut RunResult) {
        let markup = match self.fetcher.fetch(source.url.as_str()).await {
            Ok(markup) => markup,
            Err(e) => {
                error!(error = %e, "Source fetch failed; skipping source");
                result.sources_failed += 1;
                return;
            }
        };

        let candidates = extract_candidates(&markup, source, self.config.max_items);
        if candidates.is_empty() {
            warn!("No candidates found on source page");
            return;
        }
        info!(count = candidates.len(), "Processing candidates");

        for item in candidates.iter().take(self.config.max_items) {
            let outcome = self.process_item(item).await;
            match &outcome {
                ItemOutcome::Published(entry) => {
                    info!(title = %item.title, link = %entry.link, "Item published")
                }
                ItemOutcome::Skipped => info!(title = %item.title, "Item skipped as duplicate"),
                ItemOutcome::Failed(reason) => {
                    error!(title = %item.title, link = %item.link, %reason, "Item failed")
                }
            }
            result.record(&outcome);

            if matches!(outcome, ItemOutcome::Published(_)) && !self.config.sleep_between_posts.is_zero() {
                sleep(self.config.sleep_between_posts).await;
            }
        }
    }

    /// Run one candidate through the duplicate check, its detail page and the
    /// publish call.
    #[instrument(level = "info", skip_all, fields(title = %item.title))]
    pub async fn process_item(&self, item: &CandidateItem) -> ItemOutcome {
        if self.wordpress.exists(&item.title).await {
            return ItemOutcome::Skipped;
        }

        let page = match self.fetcher.fetch(item.link.as_str()).await {
            Ok(page) => page,
            Err(e) => return ItemOutcome::Failed(format!("detail page: {e}")),
        };

        let site_name = &item.origin.site_name;
        let (content, meta) = if self.config.structured_fields {
            let fields = extract_fields(&page, item.link.as_str());
            (render_structured(&fields, site_name), Some(fields))
        } else {
            (with_source_footer(&article_content(&page), site_name), None)
        };

        match self
            .wordpress
            .publish(&item.title, &content, meta.as_ref())
            .await
        {
            Ok(entry) => ItemOutcome::Published(entry),
            Err(e) => ItemOutcome::Failed(format!("publish: {e}")),
        }
    }
}
