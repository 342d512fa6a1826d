//! The producer half of the pipeline: a sequential cursor walk over the feed.
//!
//! The fetcher asks for one page at a time, newest first, and pushes each item
//! onto the bounded queue in the order the feed returned it. Every queued item
//! moves the [`Cursor`] back to the oldest timestamp handed over so far, and
//! the next request asks for items older than that.
//!
//! # Stopping
//!
//! The walk ends when
//! - the feed flags the page as the last one (`listEnd`),
//! - a page comes back empty,
//! - a request fails (no retry), or
//! - the run is cancelled, either through the token or because the consumer
//!   dropped its end of the queue.
//!
//! In every case the queue sender is dropped when [`Fetcher::run`] returns,
//! which is the end-of-stream signal for the sink writer.

use crate::api::FeedSource;
use crate::error::FetchError;
use crate::models::{Cursor, FeedPage, FeedRequest, NewsItem};
use crate::pacing::{FixedDelay, Pacer};
use tokio::sync::mpsc::Sender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Why the cursor walk ended.
#[derive(Debug)]
pub enum StopReason {
    /// The feed flagged the last page.
    Exhausted,
    /// The feed returned a page with no items.
    EmptyPage,
    /// Cancelled, or the consumer went away.
    Cancelled,
    /// A page request failed.
    Failed(FetchError),
}

/// Outcome of one [`Fetcher::run`].
#[derive(Debug)]
pub struct FetchReport {
    /// Pages received successfully.
    pub pages: usize,
    /// Items handed to the queue.
    pub items: usize,
    /// Oldest timestamp among the queued items.
    pub cursor: Cursor,
    /// Why the walk ended.
    pub stop: StopReason,
}

impl FetchReport {
    /// `true` if the walk reached the end of the feed.
    pub fn is_complete(&self) -> bool {
        matches!(self.stop, StopReason::Exhausted | StopReason::EmptyPage)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.stop {
            StopReason::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Walks the feed from the most recent item backwards.
#[derive(Debug)]
pub struct Fetcher<S, P = FixedDelay> {
    source: S,
    pacer: P,
    request: FeedRequest,
}

impl<S, P> Fetcher<S, P>
where
    S: FeedSource,
    P: Pacer,
{
    /// `request` supplies the tag and page size; its cursor is ignored and the
    /// walk always starts from the most recent item.
    pub fn new(source: S, pacer: P, request: FeedRequest) -> Self {
        Self {
            source,
            pacer,
            request,
        }
    }

    /// Run the walk, feeding `queue` until the feed is exhausted, a request
    /// fails, or `cancel` fires.
    ///
    /// Insertion waits while the queue is full; that wait is where a slow sink
    /// throttles fetching. Items already queued are never taken back.
    #[instrument(name = "fetcher", level = "info", skip_all, fields(tag = %self.request.tag_slug, limit = self.request.limit))]
    pub async fn run(self, queue: Sender<NewsItem>, cancel: CancellationToken) -> FetchReport {
        let mut report = FetchReport {
            pages: 0,
            items: 0,
            cursor: Cursor::default(),
            stop: StopReason::Cancelled,
        };

        report.stop = loop {
            let request = self.request.at(report.cursor);
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StopReason::Cancelled,
                fetched = self.source.fetch_page(&request) => fetched,
            };

            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    error!(error = %e, cursor = ?request.last_timestamp, page = report.pages + 1, "Page request failed; stopping");
                    break StopReason::Failed(e);
                }
            };
            report.pages += 1;

            let FeedPage {
                items,
                server_timestamp,
                list_end,
            } = page;
            let page_len = items.len();

            let mut delivered = true;
            for item in items {
                let published = item.published;
                let sent = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => false,
                    sent = queue.send(item) => sent.is_ok(),
                };
                if !sent {
                    delivered = false;
                    break;
                }
                report.items += 1;
                report.cursor.advance(Some(published));
            }

            info!(
                page = report.pages,
                items = page_len,
                cursor = ?report.cursor.get(),
                ?server_timestamp,
                list_end,
                "Processed page"
            );

            if !delivered {
                warn!(queued = report.items, "Queue closed or run cancelled mid-page; stopping");
                break StopReason::Cancelled;
            }
            if list_end {
                break StopReason::Exhausted;
            }
            if page_len == 0 {
                debug!("Empty page before listEnd; treating as end of feed");
                break StopReason::EmptyPage;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break StopReason::Cancelled,
                _ = self.pacer.pause() => {}
            }
        };

        info!(pages = report.pages, items = report.items, stop = ?report.stop, "Fetcher finished");
        // `queue` drops here: end-of-stream for the writer.
        report
    }
}
