//! Run coordination: one bounded queue, one fetcher, one sink writer.
//!
//! ```text
//! ┌─────────┐  NewsItem  ┌──────────────┐  record  ┌──────────────┐
//! │ Fetcher │ ─────────► │ bounded mpsc │ ───────► │  SinkWriter  │ ──► result file
//! └─────────┘            └──────────────┘          └──────────────┘
//!      ▲                                                  │
//!      └──────────── CancellationToken (on failure) ──────┘
//! ```
//!
//! Both halves run concurrently on the calling task. The run ends once both
//! have returned: the fetcher by exhausting the feed, failing, or being
//! cancelled (its sender drop closes the queue); the writer by draining the
//! closed queue or failing a write. A run is one best-effort pass from the most
//! recent item backwards and is never retried as a whole.

use crate::api::FeedSource;
use crate::error::SinkError;
use crate::fetcher::{FetchReport, Fetcher};
use crate::models::{FeedRequest, NewsItem};
use crate::outputs::writer::{SinkWriter, WriteReport};
use crate::pacing::{FixedDelay, Pacer};
use chrono::{Local, TimeZone};
use std::fmt::Display;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span};

/// Everything a run needs besides the feed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Tag whose news are archived.
    pub tag: String,
    /// Items requested per page.
    pub page_size: u32,
    /// Maximum number of items in flight between fetcher and writer.
    pub queue_capacity: usize,
    /// Pause between page requests.
    pub page_delay: Duration,
    /// Result file, created or truncated at the start of the run.
    pub output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tag: "krizis-na-ukraine".to_string(),
            page_size: 10,
            queue_capacity: 1000,
            page_delay: Duration::from_millis(100),
            output: PathBuf::from("./result.txt"),
        }
    }
}

/// Outcome of a whole run.
#[derive(Debug)]
pub struct RunReport {
    pub fetch: FetchReport,
    pub write: Result<WriteReport, SinkError>,
    pub elapsed: Duration,
}

impl RunReport {
    /// `true` if the whole feed reached the result file.
    pub fn is_complete(&self) -> bool {
        self.fetch.is_complete() && self.write.is_ok()
    }

    /// Records persisted, as far as the writer got before it finished.
    pub fn records(&self) -> usize {
        match &self.write {
            Ok(report) => report.records,
            Err(SinkError::Write { records, .. }) => *records,
            Err(_) => 0,
        }
    }
}

pub struct Pipeline<S, P = FixedDelay, Tz = Local> {
    fetcher: Fetcher<S, P>,
    writer: SinkWriter<Tz>,
    queue_capacity: usize,
    cancel: CancellationToken,
}

impl<S: FeedSource> Pipeline<S> {
    /// Pipeline over `source` configured from `config`, writing local times.
    pub fn new(source: S, config: &PipelineConfig) -> Self {
        let request = FeedRequest::first_page(config.tag.clone(), config.page_size);
        Self::from_parts(
            Fetcher::new(source, FixedDelay(config.page_delay), request),
            SinkWriter::new(config.output.clone()),
            config.queue_capacity,
        )
    }
}

impl<S, P, Tz> Pipeline<S, P, Tz>
where
    S: FeedSource,
    P: Pacer,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn from_parts(fetcher: Fetcher<S, P>, writer: SinkWriter<Tz>, queue_capacity: usize) -> Self {
        Self {
            fetcher,
            writer,
            queue_capacity: queue_capacity.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the fetcher when cancelled.
    ///
    /// The writer still drains whatever was queued before the stop.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run both halves to completion.
    pub async fn run(self) -> RunReport {
        let Self {
            fetcher,
            writer,
            queue_capacity,
            cancel,
        } = self;
        let span = info_span!(
            "pipeline",
            capacity = queue_capacity,
            output = %writer.path().display()
        );

        coordinate(fetcher, queue_capacity, cancel, |rx, cancel| writer.run(rx, cancel))
            .instrument(span)
            .await
    }
}

/// Join the fetcher with `sink` over a fresh queue of `capacity` items.
async fn coordinate<S, P, F, Fut>(
    fetcher: Fetcher<S, P>,
    capacity: usize,
    cancel: CancellationToken,
    sink: F,
) -> RunReport
where
    S: FeedSource,
    P: Pacer,
    F: FnOnce(mpsc::Receiver<NewsItem>, CancellationToken) -> Fut,
    Fut: Future<Output = Result<WriteReport, SinkError>>,
{
    let started = Instant::now();
    let (tx, rx) = mpsc::channel(capacity);
    info!("Pipeline starting");

    let (fetch, write) = tokio::join!(fetcher.run(tx, cancel.clone()), sink(rx, cancel.clone()));

    let report = RunReport {
        fetch,
        write,
        elapsed: started.elapsed(),
    };
    info!(
        complete = report.is_complete(),
        pages = report.fetch.pages,
        records = report.records(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Pipeline ended"
    );
    report
}
