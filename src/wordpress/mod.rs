//! WordPress REST API client.
//!
//! Both remote operations go through the `wp/v2/posts` collection with HTTP
//! Basic auth (user + application password):
//!
//! - [`dedup`]: search existing posts for an equal title
//! - [`publisher`]: create a published post
//!
//! The remote site is the only record of what has been posted; nothing is
//! cached between calls.

pub mod dedup;
pub mod publisher;

use crate::config::WordPressConfig;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

/// Authenticated handle on one WordPress site.
#[derive(Debug, Clone)]
pub struct WpClient {
    client: Client,
    config: WordPressConfig,
}

impl WpClient {
    pub fn new(config: WordPressConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn get(&self, timeout: Duration) -> RequestBuilder {
        self.client
            .get(self.config.posts_endpoint())
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .timeout(timeout)
    }

    fn post(&self, timeout: Duration) -> RequestBuilder {
        self.client
            .post(self.config.posts_endpoint())
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .timeout(timeout)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn client(site_url: &str) -> WpClient {
        WpClient::new(WordPressConfig {
            site_url: site_url.trim_end_matches('/').to_string(),
            username: "bot".to_string(),
            app_password: "app pass".to_string(),
            categories: vec![1],
            search_timeout: Duration::from_secs(5),
            create_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    /// `Authorization` header value for bot / "app pass".
    pub const BASIC_AUTH: &str = "Basic Ym90OmFwcCBwYXNz";
}
