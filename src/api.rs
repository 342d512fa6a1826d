//! Feed endpoint access.
//!
//! # Architecture
//!
//! - [`FeedSource`]: Core trait, one call per page
//! - [`HttpFeedSource`]: Talks to the real endpoint over HTTP with `reqwest`
//!
//! Every request is a single attempt. Transport failures, non-2xx statuses and
//! undecodable bodies come back as a [`FetchError`] and the caller decides
//! what to do (the fetcher stops).

use crate::error::FetchError;
use crate::models::{FeedPage, FeedRequest};
use crate::utils::truncate_for_log;
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, trace, warn};
use url::Url;

/// Maximum number of body bytes echoed into trace logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Something that can serve feed pages.
///
/// The fetcher is generic over this trait so tests can substitute scripted
/// page sequences for the network.
#[allow(async_fn_in_trait)]
pub trait FeedSource {
    /// Request the page described by `request`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`] - Connection, TLS or timeout errors
    /// - [`FetchError::Status`] - Non-2xx HTTP response
    /// - [`FetchError::Decode`] - Body is not a valid page
    async fn fetch_page(&self, request: &FeedRequest) -> Result<FeedPage, FetchError>;
}

/// [`FeedSource`] backed by an HTTP endpoint accepting JSON `POST` requests.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpFeedSource {
    /// Build a source for `endpoint` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be built
    /// (for example when the TLS backend fails to initialize).
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Use an already configured client.
    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl fmt::Debug for HttpFeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFeedSource")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl FeedSource for HttpFeedSource {
    #[instrument(level = "debug", skip_all, fields(endpoint = %self.endpoint, cursor = ?request.last_timestamp))]
    async fn fetch_page(&self, request: &FeedRequest) -> Result<FeedPage, FetchError> {
        let t0 = Instant::now();
        let body = serde_json::to_vec(request).map_err(FetchError::Encode)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Feed returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        trace!(
            body = %truncate_for_log(&String::from_utf8_lossy(&bytes), BODY_PREVIEW_LEN),
            "Feed response"
        );

        let page: FeedPage = serde_json::from_slice(&bytes).map_err(FetchError::Decode)?;
        debug!(
            items = page.items.len(),
            list_end = page.list_end,
            server_timestamp = ?page.server_timestamp,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(page)
    }
}
