//! Post creation.

use super::WpClient;
use crate::error::RemoteError;
use crate::models::{PublishedEntry, StructuredFields};
use crate::utils::truncate_for_log;
use serde::Serialize;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize)]
struct NewPost<'a> {
    title: &'a str,
    content: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a StructuredFields>,
    #[serde(skip_serializing_if = "<[u64]>::is_empty")]
    categories: &'a [u64],
}

impl WpClient {
    /// Create an immediately published post.
    ///
    /// `meta` is attached verbatim as the post's `meta` object. No retry is
    /// attempted; a rejected create is returned with its status and body.
    #[instrument(level = "info", skip(self, content, meta))]
    pub async fn publish(
        &self,
        title: &str,
        content: &str,
        meta: Option<&StructuredFields>,
    ) -> Result<PublishedEntry, RemoteError> {
        let post = NewPost {
            title,
            content,
            status: "publish",
            meta,
            categories: &self.config.categories,
        };

        let response = self
            .post(self.config.create_timeout)
            .json(&post)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 300),
                "WordPress rejected post"
            );
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let entry: PublishedEntry = serde_json::from_str(&body)?;
        info!(id = entry.id, link = %entry.link, "Published post");
        Ok(entry)
    }
}
