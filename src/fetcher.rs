//! Single-shot page downloads.
//!
//! The [`Fetcher`] performs one GET per call with a fixed timeout and
//! User-Agent. There are no retries; callers treat a failure as "nothing from
//! this page".

use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::Client;
use tracing::{debug, instrument};

/// HTTP client for source and article pages.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Download `url` and return its body as text.
    ///
    /// # Errors
    ///
    /// [`FetchError::Transport`] for connection, timeout and body errors,
    /// [`FetchError::Status`] for any non-2xx answer.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
