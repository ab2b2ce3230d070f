//! Validated runtime configuration.
//!
//! [`Config`] is built once from the parsed [`Cli`] and handed to every
//! component. Missing credentials are reported here, before the first
//! request goes out.
//!
//! # Sources file
//!
//! ```yaml
//! - name: Free Job Alert
//!   strategy: read_more
//!   categories:
//!     - https://www.freejobalert.com/latest-notifications/
//! ```
//!
//! Each site expands to one [`Source`] per category URL. Without a file the
//! built-in table from [`default_sites`] is used.

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::models::{Source, Strategy};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_MAX_ITEMS: usize = 10;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; JobAutopostBot/1.0)";

/// Connection settings for the WordPress REST API.
#[derive(Debug, Clone)]
pub struct WordPressConfig {
    /// Site base URL without a trailing slash.
    pub site_url: String,
    pub username: String,
    pub app_password: String,
    /// Category ids sent with each new post; empty omits the field.
    pub categories: Vec<u64>,
    pub search_timeout: Duration,
    pub create_timeout: Duration,
}

impl WordPressConfig {
    /// The `wp/v2/posts` collection endpoint.
    pub fn posts_endpoint(&self) -> String {
        format!("{}/wp-json/wp/v2/posts", self.site_url)
    }
}

/// Settings for page downloads.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub wordpress: WordPressConfig,
    pub fetch: FetchConfig,
    /// Items processed per source.
    pub max_items: usize,
    /// Pause after each successful publish.
    pub sleep_between_posts: Duration,
    /// Build post bodies from [`crate::models::StructuredFields`] and attach
    /// them as post meta.
    pub structured_fields: bool,
    pub sources: Vec<Source>,
}

/// One site entry in the sources file.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub strategy: Strategy,
    pub categories: Vec<String>,
}

impl Config {
    /// Validate CLI/environment values and load the source list.
    #[instrument(level = "info", skip_all)]
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let site_url = required(&cli.wp_site_url, "WP_SITE_URL")?;
        let username = required(&cli.wp_username, "WP_USERNAME")?;
        let app_password = required(&cli.wp_app_password, "WP_APP_PASSWORD")?;

        let site_url = site_url.trim_end_matches('/').to_string();
        Url::parse(&site_url).map_err(|e| ConfigError::Invalid {
            key: "WP_SITE_URL",
            message: e.to_string(),
        })?;

        let max_items = cli
            .max_items
            .or(cli.max_per_category)
            .unwrap_or(DEFAULT_MAX_ITEMS);
        if max_items == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_ITEMS",
                message: "must be at least 1".to_string(),
            });
        }

        let sites = match &cli.sources_file {
            Some(path) => load_sites(path)?,
            None => default_sites(),
        };
        let sources = expand_sites(&sites)?;

        let user_agent = cli
            .user_agent
            .as_deref()
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
            .to_string();

        let config = Config {
            wordpress: WordPressConfig {
                site_url,
                username,
                app_password,
                categories: cli.categories.clone(),
                search_timeout: Duration::from_secs(10),
                create_timeout: Duration::from_secs(30),
            },
            fetch: FetchConfig {
                user_agent,
                timeout: Duration::from_secs(cli.fetch_timeout),
            },
            max_items,
            sleep_between_posts: Duration::from_secs(cli.sleep_between_posts),
            structured_fields: cli.structured_fields,
            sources,
        };
        info!(
            site = %config.wordpress.site_url,
            sources = config.sources.len(),
            max_items = config.max_items,
            sleep_secs = cli.sleep_between_posts,
            structured_fields = config.structured_fields,
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn required(value: &Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Read a YAML site list from disk.
pub fn load_sites(path: &str) -> Result<Vec<SiteConfig>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::SourcesIo {
        path: path.to_string(),
        source,
    })?;
    let sites: Vec<SiteConfig> =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::SourcesParse {
            path: path.to_string(),
            source,
        })?;
    debug!(path, sites = sites.len(), "Loaded sources file");
    Ok(sites)
}

/// Flatten sites into one [`Source`] per category URL.
pub fn expand_sites(sites: &[SiteConfig]) -> Result<Vec<Source>, ConfigError> {
    let mut sources = Vec::new();
    for site in sites {
        for category in &site.categories {
            let url = Url::parse(category).map_err(|e| ConfigError::Invalid {
                key: "SOURCES_FILE",
                message: format!("{category}: {e}"),
            })?;
            sources.push(Source {
                site_name: site.name.clone(),
                url,
                strategy: site.strategy,
            });
        }
    }
    if sources.is_empty() {
        return Err(ConfigError::Invalid {
            key: "SOURCES_FILE",
            message: "no category URLs configured".to_string(),
        });
    }
    Ok(sources)
}

/// The site list polled when no sources file is given.
pub fn default_sites() -> Vec<SiteConfig> {
    fn site(name: &str, strategy: Strategy, categories: &[&str]) -> SiteConfig {
        SiteConfig {
            name: name.to_string(),
            strategy,
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    vec![
        site(
            "Free Job Alert",
            Strategy::ReadMore,
            &[
                "https://www.freejobalert.com/latest-notifications/",
                "https://www.freejobalert.com/bank-jobs/",
                "https://www.freejobalert.com/railway-jobs/",
                "https://www.freejobalert.com/police-jobs/",
                "https://www.freejobalert.com/ssc-jobs/",
                "https://www.freejobalert.com/defence-jobs/",
            ],
        ),
        site("Sarkari Result IM", Strategy::Headings, &["https://sarkariresult.com.im/"]),
        site("Sarkari Result CM", Strategy::Headings, &["https://sarkariresult.com.cm/"]),
        site(
            "Testbook",
            Strategy::PathMarkers,
            &["https://testbook.com/career", "https://testbook.com/blog/category/jobs"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec![
            "job_autopost",
            "--wp-site-url",
            "https://example.com/",
            "--wp-username",
            "bot",
            "--wp-app-password",
            "secret",
        ];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn test_from_cli_defaults() {
        let config = Config::from_cli(&cli(&[])).unwrap();
        assert_eq!(config.wordpress.site_url, "https://example.com");
        assert_eq!(
            config.wordpress.posts_endpoint(),
            "https://example.com/wp-json/wp/v2/posts"
        );
        assert_eq!(config.max_items, DEFAULT_MAX_ITEMS);
        assert_eq!(config.sleep_between_posts, Duration::from_secs(3));
        assert_eq!(config.fetch.timeout, Duration::from_secs(20));
        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.sources.len(), 10);
    }

    #[test]
    fn test_missing_credentials_are_fatal() {
        let cli = Cli::parse_from(["job_autopost", "--wp-site-url", "https://example.com"]);
        let err = Config::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("WP_USERNAME")));
    }

    #[test]
    fn test_blank_credentials_are_missing() {
        let cli = Cli::parse_from([
            "job_autopost",
            "--wp-site-url",
            "https://example.com",
            "--wp-username",
            "bot",
            "--wp-app-password",
            "   ",
        ]);
        let err = Config::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("WP_APP_PASSWORD")));
    }

    #[test]
    fn test_invalid_site_url() {
        let cli = Cli::parse_from([
            "job_autopost",
            "--wp-site-url",
            "not a url",
            "--wp-username",
            "bot",
            "--wp-app-password",
            "secret",
        ]);
        let err = Config::from_cli(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "WP_SITE_URL", .. }));
    }

    #[test]
    fn test_max_per_category_fallback() {
        let config = Config::from_cli(&cli(&["--max-per-category", "4"])).unwrap();
        assert_eq!(config.max_items, 4);
        let config = Config::from_cli(&cli(&["--max-per-category", "4", "--max-items", "2"])).unwrap();
        assert_eq!(config.max_items, 2);
    }

    #[test]
    fn test_zero_max_items_rejected() {
        let err = Config::from_cli(&cli(&["--max-items", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MAX_ITEMS", .. }));
    }

    #[test]
    fn test_sources_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- name: Example Jobs\n  strategy: headings\n  categories:\n    - https://jobs.example.com/a/\n    - https://jobs.example.com/b/"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = Config::from_cli(&cli(&["--sources", &path])).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].site_name, "Example Jobs");
        assert_eq!(config.sources[1].url.as_str(), "https://jobs.example.com/b/");
        assert_eq!(config.sources[0].strategy, Strategy::Headings);
    }

    #[test]
    fn test_sources_file_errors() {
        let err = load_sites("/nonexistent/sources.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::SourcesIo { .. }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- name: Broken\n  strategy: sideways\n  categories: []").unwrap();
        let err = load_sites(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::SourcesParse { .. }));
    }

    #[test]
    fn test_expand_sites_rejects_bad_url_and_empty_list() {
        let bad = vec![SiteConfig {
            name: "Bad".to_string(),
            strategy: Strategy::ReadMore,
            categories: vec!["relative/path".to_string()],
        }];
        assert!(expand_sites(&bad).is_err());
        assert!(expand_sites(&[]).is_err());
    }
}
