//! Error types for the two halves of the pipeline.
//!
//! Fetch-side failures ([`FetchError`]) end the cursor walk; sink-side
//! failures ([`SinkError`]) end the drain loop. Neither is escalated past the
//! pipeline: the coordinator reports them and the process exits normally.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop the fetcher.
///
/// None of these are retried. A failed page simply ends the walk, and every
/// item queued before it still reaches the sink.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout, body read).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// HTTP response with a non-2xx status code.
    #[error("HTTP error: status {0}")]
    Status(u16),
    /// The page body was not a valid feed page.
    #[error("malformed page body: {0}")]
    Decode(#[source] serde_json::Error),
    /// The request parameters could not be serialized.
    #[error("could not encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors raised while persisting records (the resource error family).
#[derive(Debug, Error)]
pub enum SinkError {
    /// The destination could not be created or truncated.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A record could not be appended. `records` counts the lines that were
    /// persisted before it.
    #[error("write failed after {records} records: {source}")]
    Write {
        records: usize,
        #[source]
        source: io::Error,
    },
    /// Flushing or closing the destination failed after the last record.
    #[error("close failed: {0}")]
    Close(#[source] io::Error),
}
