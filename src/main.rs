//! # Tag News Archive
//!
//! Archives a paginated tag news feed to a text file, newest item first.
//!
//! ## Usage
//!
//! ```sh
//! tag_news_archive -t krizis-na-ukraine -o ./result.txt
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: Walk the feed page by page, following the oldest timestamp seen
//! 2. **Queueing**: Hand items to the writer through a bounded queue
//! 3. **Writing**: Append one line per item to the result file
//!
//! A run that stops early (feed error, write error, Ctrl-C) still exits
//! normally; the result file then holds a partial archive.

use clap::Parser;
use std::error::Error;
use tag_news_archive::api::HttpFeedSource;
use tag_news_archive::cli::Cli;
use tag_news_archive::pipeline::Pipeline;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
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

    info!("tag_news_archive starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = args.pipeline_config();
    let source = HttpFeedSource::new(args.endpoint.clone(), args.request_timeout()).map_err(|e| {
        error!(error = %e, "Failed to build HTTP client");
        e
    })?;
    info!(
        endpoint = %source.endpoint(),
        tag = %config.tag,
        output = %config.output.display(),
        "Archiving feed"
    );

    let pipeline = Pipeline::new(source, &config);

    // Ctrl-C stops fetching; whatever is already queued still gets written.
    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; finishing queued records");
            cancel.cancel();
        }
    });

    let report = pipeline.run().await;

    if let Some(e) = report.fetch.error() {
        warn!(error = %e, "Feed walk ended early; archive is partial");
    }
    if let Err(e) = &report.write {
        error!(error = %e, path = %config.output.display(), "Result file is incomplete");
    }

    let elapsed = report.elapsed;
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        pages = report.fetch.pages,
        records = report.records(),
        stop = ?report.fetch.stop,
        complete = report.is_complete(),
        "Execution complete"
    );

    Ok(())
}
