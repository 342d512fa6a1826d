//! Shared test helpers: a scripted feed, a failing destination and item
//! builders.

use crate::api::FeedSource;
use crate::error::FetchError;
use crate::models::{FeedPage, FeedRequest, NewsItem};
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Serves a fixed sequence of responses and records every request it gets.
pub(crate) struct ScriptedSource {
    responses: Mutex<VecDeque<Result<FeedPage, FetchError>>>,
    requests: Mutex<Vec<FeedRequest>>,
}

impl ScriptedSource {
    pub(crate) fn new(responses: Vec<Result<FeedPage, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `lastTimestamp` of every request, in order.
    pub(crate) fn cursors(&self) -> Vec<Option<i64>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.last_timestamp)
            .collect()
    }
}

impl FeedSource for &ScriptedSource {
    async fn fetch_page(&self, request: &FeedRequest) -> Result<FeedPage, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fetcher requested more pages than scripted")
    }
}

pub(crate) fn news_item(id: i64, published: i64) -> NewsItem {
    NewsItem {
        id,
        category: "world".to_string(),
        title: format!("Story {id}"),
        link: format!("https://example.com/{id}"),
        published,
    }
}

pub(crate) fn page(items: Vec<NewsItem>, list_end: bool) -> Result<FeedPage, FetchError> {
    Ok(FeedPage {
        items,
        server_timestamp: Some(2_000),
        list_end,
    })
}

/// Collects bytes and fails the `fail_on`-th write call.
pub(crate) struct FailingWriter {
    pub(crate) written: Vec<u8>,
    pub(crate) writes: usize,
    fail_on: usize,
}

impl FailingWriter {
    pub(crate) fn failing_on(fail_on: usize) -> Self {
        Self {
            written: Vec::new(),
            writes: 0,
            fail_on,
        }
    }
}

impl AsyncWrite for FailingWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.writes += 1;
        if self.writes == self.fail_on {
            return Poll::Ready(Err(io::Error::other("disk full")));
        }
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
