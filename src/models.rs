//! Data models for the tag news feed.
//!
//! This module defines the wire types exchanged with the feed endpoint and the
//! pagination cursor derived from them:
//! - [`NewsItem`]: One feed entry
//! - [`FeedPage`]: One response from the feed
//! - [`FeedRequest`]: The body of a page request
//! - [`Cursor`]: The "older than" boundary for the next request
//!
//! The feed speaks camelCase JSON with a few terse field names (`mark` for the
//! category, `date` for the publication timestamp), mapped here with serde
//! renames so the Rust side keeps descriptive names.

use serde::{Deserialize, Serialize};

/// A single news entry as returned by the feed.
///
/// Items are immutable once fetched. They move by value from the fetcher,
/// through the queue, into the sink writer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewsItem {
    /// Feed-assigned identifier.
    pub id: i64,
    /// Category tag of the entry.
    #[serde(rename = "mark", default)]
    pub category: String,
    /// Headline.
    pub title: String,
    /// Link to the full story.
    pub link: String,
    /// Publication time in seconds since the Unix epoch.
    #[serde(rename = "date")]
    pub published: i64,
}

/// One page of the feed.
///
/// # JSON Schema
///
/// ```json
/// { "tagNews": [ ... ], "timestamp": 1700000000, "listEnd": false }
/// ```
///
/// A missing `tagNews` array is treated as an empty page and a missing
/// `listEnd` as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedPage {
    /// Items in feed order (newest first).
    #[serde(rename = "tagNews", default)]
    pub items: Vec<NewsItem>,
    /// Server clock at the time of the response, when supplied.
    #[serde(rename = "timestamp", default)]
    pub server_timestamp: Option<i64>,
    /// Set on the last page of the feed.
    #[serde(rename = "listEnd", default)]
    pub list_end: bool,
}

/// Body of a page request.
///
/// `lastTimestamp` is serialized as `null` on the first request, which the
/// feed reads as "start from the most recent item".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    /// Tag whose news are requested.
    pub tag_slug: String,
    /// Page size.
    pub limit: u32,
    /// Only return items older than this timestamp.
    pub last_timestamp: Option<i64>,
}

impl FeedRequest {
    /// Request for the most recent page of `tag_slug`.
    pub fn first_page(tag_slug: impl Into<String>, limit: u32) -> Self {
        Self {
            tag_slug: tag_slug.into(),
            limit,
            last_timestamp: None,
        }
    }

    /// The same request positioned at `cursor`.
    pub fn at(&self, cursor: Cursor) -> Self {
        Self {
            last_timestamp: cursor.get(),
            ..self.clone()
        }
    }
}

/// Pagination boundary: the oldest publication timestamp seen so far.
///
/// Starts unset ("most recent"). Every item handed to the queue moves it to
/// the minimum of its previous value and that item's timestamp, so it never
/// increases and never points past an item the writer did not receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(Option<i64>);

impl Cursor {
    pub fn get(self) -> Option<i64> {
        self.0
    }

    /// Fold a timestamp into the cursor. `None` leaves it unchanged.
    pub fn advance(&mut self, published: Option<i64>) {
        self.0 = match (self.0, published) {
            (Some(current), Some(oldest)) => Some(current.min(oldest)),
            (None, oldest) => oldest,
            (current, None) => current,
        };
    }
}
