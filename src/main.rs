//! # job_autopost
//!
//! Polls job-notification sites, extracts new postings and publishes each one
//! to a WordPress site through its REST API.
//!
//! ## Features
//!
//! - Listing extraction with per-site heuristic chains (headings, "read more"
//!   markers, section paths)
//! - Structured extraction of dates, vacancy, fee, age limit, selection
//!   process and important links from notification pages
//! - Duplicate suppression by live title search on the WordPress site; no
//!   local state between runs
//! - Per-item failure isolation with an end-of-run summary
//!
//! ## Usage
//!
//! ```sh
//! WP_SITE_URL=https://example.com WP_USERNAME=bot WP_APP_PASSWORD=xxxx job_autopost
//! ```
//!
//! ## Architecture
//!
//! The application follows a sequential pipeline:
//! 1. **Fetching**: download each configured listing page
//! 2. **Extraction**: turn the page into capped, deduplicated candidates
//! 3. **Deduplication**: search WordPress for an equal title
//! 4. **Publishing**: fetch the notification page, render it, create the post

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;
mod wordpress;

use cli::Cli;
use config::Config;
use pipeline::Pipeline;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(
        started_at = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        version = env!("CARGO_PKG_VERSION"),
        "job_autopost starting up"
    );

    let args = Cli::parse();
    debug!(?args.sources_file, ?args.max_items, "Parsed CLI arguments");

    // Credentials are checked before any request goes out
    let config = match Config::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration; nothing was fetched");
            return Err(e.into());
        }
    };

    let pipeline = Pipeline::new(config)?;
    // Counters are logged once, by the pipeline's run summary
    pipeline.run().await;

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");

    Ok(())
}
