//! Remote duplicate detection.
//!
//! WordPress search is fuzzy, so the results are only a shortlist: an item is
//! a duplicate when one of them has exactly the same title once both are
//! trimmed and lowercased.
//!
//! The check fails open. If the search request fails the item is treated as
//! new, so a flaky API never silently suppresses a posting.

use super::WpClient;
use crate::error::RemoteError;
use crate::utils::{html_to_text, normalize_title, truncate_for_log};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Search results examined per title.
pub const SEARCH_PAGE_SIZE: u32 = 5;

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: RenderedTitle,
}

#[derive(Debug, Default, Deserialize)]
struct RenderedTitle {
    #[serde(default)]
    rendered: String,
}

impl WpClient {
    /// True when a post with an equal normalized title already exists.
    #[instrument(level = "info", skip(self))]
    pub async fn exists(&self, title: &str) -> bool {
        match self.search_titles(title).await {
            Ok(titles) => {
                let key = normalize_title(title);
                let duplicate = titles.iter().any(|t| normalize_title(t) == key);
                if duplicate {
                    info!("Post already exists");
                } else {
                    debug!(hits = titles.len(), "No post with an equal title");
                }
                duplicate
            }
            Err(e) => {
                warn!(error = %e, "Duplicate check failed; treating item as new");
                false
            }
        }
    }

    /// Plain-text titles of the posts WordPress returns for `term`.
    pub async fn search_titles(&self, term: &str) -> Result<Vec<String>, RemoteError> {
        let per_page = SEARCH_PAGE_SIZE.to_string();
        let response = self
            .get(self.config.search_timeout)
            .query(&[
                ("search", term),
                ("per_page", per_page.as_str()),
                ("_fields", "id,title"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let hits: Vec<SearchHit> = serde_json::from_str(&body)?;
        Ok(hits
            .into_iter()
            .map(|hit| html_to_text(&hit.title.rendered))
            .collect())
    }
}
