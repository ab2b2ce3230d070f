//! Error types for the scrape → publish pipeline.
//!
//! Errors are split by failure class because each class is handled
//! differently by the orchestrator:
//!
//! - [`ConfigError`]: fatal, reported before any network activity
//! - [`FetchError`]: a source or article page could not be downloaded
//! - [`RemoteError`]: the WordPress REST API rejected or failed a request
//!
//! Heuristic extraction never fails; a miss is an empty value.

use thiserror::Error;

/// Invalid or missing startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting is present but unusable.
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    /// The sources file could not be read.
    #[error("failed to read sources file {path}: {source}")]
    SourcesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The sources file is not valid YAML for a source list.
    #[error("failed to parse sources file {path}: {source}")]
    SourcesParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// A page download failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// A WordPress REST API call failed.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("WordPress request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with an unexpected status.
    #[error("WordPress returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected WordPress response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_setting() {
        let e = ConfigError::Missing("WP_SITE_URL");
        assert_eq!(e.to_string(), "missing required setting WP_SITE_URL");
    }

    #[test]
    fn test_remote_status_carries_body() {
        let e = RemoteError::Status {
            status: 403,
            body: "rest_cannot_create".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("rest_cannot_create"));
    }

    #[test]
    fn test_fetch_status_message() {
        let e = FetchError::Status {
            url: "https://example.com/".to_string(),
            status: 503,
        };
        assert_eq!(e.to_string(), "https://example.com/ returned HTTP 503");
    }
}
