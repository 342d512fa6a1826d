//! Output side of the pipeline.
//!
//! # Submodules
//!
//! - [`record`]: Text layout of a single result line
//! - [`writer`]: Drains the queue into the result file
//!
//! # Output Layout
//!
//! ```text
//! result.txt
//! 2024-02-24T09:15:00 Newest headline <https://example.com/newest>
//! 2024-02-24T08:40:12 Older headline <https://example.com/older>
//! ...
//! ```
//!
//! No header or trailer; lines appear in the order the feed served them.

pub mod record;
pub mod writer;
