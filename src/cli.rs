//! Command-line interface definitions for job_autopost.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every argument can also be provided through an environment variable, which
//! is how scheduled runs usually configure the poster.

use clap::Parser;

/// Command-line arguments for the poster.
///
/// Values are validated and turned into a [`crate::config::Config`] before
/// any network activity; nothing here is read again after startup.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment, defaults for everything else
/// WP_SITE_URL=https://example.com WP_USERNAME=bot WP_APP_PASSWORD=xxxx job_autopost
///
/// # Three items per source, custom source list
/// job_autopost --max-items 3 --sources ./sources.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base URL of the WordPress site
    #[arg(long, env = "WP_SITE_URL")]
    pub wp_site_url: Option<String>,

    /// WordPress user the application password belongs to
    #[arg(long, env = "WP_USERNAME")]
    pub wp_username: Option<String>,

    /// WordPress application password
    #[arg(long, env = "WP_APP_PASSWORD", hide_env_values = true)]
    pub wp_app_password: Option<String>,

    /// Maximum number of items processed per source
    #[arg(long, env = "MAX_ITEMS")]
    pub max_items: Option<usize>,

    /// Older name for --max-items, used when MAX_ITEMS is unset
    #[arg(long, env = "MAX_PER_CATEGORY", hide = true)]
    pub max_per_category: Option<usize>,

    /// Seconds to wait after each published post
    #[arg(long, env = "SLEEP_BETWEEN_POSTS", default_value_t = 3)]
    pub sleep_between_posts: u64,

    /// YAML file listing the sites and category pages to poll
    #[arg(long = "sources", env = "SOURCES_FILE")]
    pub sources_file: Option<String>,

    /// User-Agent sent with every page fetch
    #[arg(long, env = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Page fetch timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 20)]
    pub fetch_timeout: u64,

    /// WordPress category ids assigned to new posts
    #[arg(long = "category", env = "WP_CATEGORIES", value_delimiter = ',', default_value = "1")]
    pub categories: Vec<u64>,

    /// Extract dates, vacancy, fee and link sections from article pages
    #[arg(
        long,
        env = "STRUCTURED_FIELDS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub structured_fields: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "job_autopost",
            "--wp-site-url",
            "https://example.com/",
            "--wp-username",
            "bot",
            "--wp-app-password",
            "secret",
            "--max-items",
            "3",
        ]);

        assert_eq!(cli.wp_site_url.as_deref(), Some("https://example.com/"));
        assert_eq!(cli.wp_username.as_deref(), Some("bot"));
        assert_eq!(cli.max_items, Some(3));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["job_autopost"]);

        assert_eq!(cli.sleep_between_posts, 3);
        assert_eq!(cli.fetch_timeout, 20);
        assert_eq!(cli.categories, vec![1]);
        assert!(cli.structured_fields);
    }

    #[test]
    fn test_cli_category_list_and_flags() {
        let cli = Cli::parse_from([
            "job_autopost",
            "--category",
            "4,9",
            "--structured-fields",
            "false",
        ]);

        assert_eq!(cli.categories, vec![4, 9]);
        assert!(!cli.structured_fields);
    }
}
