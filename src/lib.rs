//! # Tag News Archive
//!
//! Walks a paginated tag news feed from the most recent item backwards and
//! archives every item, in the order served, to a plain text file.
//!
//! ## Architecture
//!
//! The crate is a two-stage streaming pipeline:
//! 1. **Fetching** ([`fetcher`]): Request pages with a rolling timestamp
//!    cursor and push items onto a bounded queue
//! 2. **Writing** ([`outputs::writer`]): Drain the queue into the result file,
//!    one line per item
//!
//! [`pipeline`] wires the two together; a full queue slows the fetcher down
//! to the writer's pace, and a failing writer cancels the fetcher.

pub mod api;
pub mod cli;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod outputs;
pub mod pacing;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
mod test_helpers;
