//! Text layout of the result file.
//!
//! One line per item:
//!
//! ```text
//! 2024-02-24T06:15:00 Headline text <https://example.com/story>
//! ```
//!
//! The timestamp is rendered in the configured time zone (local time in the
//! binary) with a 12-hour clock and no AM/PM marker, matching the layout
//! earlier archives were written with.

use crate::models::NewsItem;
use chrono::TimeZone;
use std::fmt::Display;

/// `strftime` pattern for the timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%I:%M:%S";

/// Render a Unix timestamp (seconds) in `tz`.
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn format_timestamp<Tz>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_opt(secs, 0)
        .earliest()
        .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Format the complete line for `item`, trailing newline included.
///
/// Line breaks inside the title are folded into spaces so every item stays on
/// exactly one line. An unrepresentable timestamp is written as raw seconds.
pub fn format_record<Tz>(item: &NewsItem, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let when = format_timestamp(item.published, tz).unwrap_or_else(|| item.published.to_string());
    let title = item.title.replace(['\r', '\n'], " ");
    format!("{} {} <{}>\n", when, title, item.link)
}
