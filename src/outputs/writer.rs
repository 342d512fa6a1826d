//! The consumer half of the pipeline.
//!
//! [`SinkWriter`] owns the result file for the duration of a run. It takes
//! items off the queue one at a time, in the order they were queued, and
//! appends one formatted line per item. It stops when the queue reports
//! end-of-stream (the fetcher dropped its sender and everything queued has
//! been taken) or on the first failed write.
//!
//! On a failed write the writer cancels the run token and drops its end of
//! the queue, so a fetcher parked on a full queue wakes up and stops instead
//! of waiting forever. Items still queued at that point are discarded.

use super::record::format_record;
use crate::error::SinkError;
use crate::models::NewsItem;
use crate::utils::ensure_parent_dir;
use chrono::{Local, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// Totals for one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Lines appended.
    pub records: usize,
    /// Bytes appended.
    pub bytes: usize,
}

/// Appends queued items to a text file.
#[derive(Debug, Clone)]
pub struct SinkWriter<Tz = Local> {
    path: PathBuf,
    tz: Tz,
}

impl SinkWriter<Local> {
    /// Writer for `path`, rendering timestamps in local time.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tz: Local,
        }
    }
}

impl<Tz> SinkWriter<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    /// Same destination, timestamps rendered in `tz`.
    pub fn with_timezone<Tz2: TimeZone>(self, tz: Tz2) -> SinkWriter<Tz2> {
        SinkWriter {
            path: self.path,
            tz,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (or truncate) the destination and drain `queue` into it.
    ///
    /// # Errors
    ///
    /// - [`SinkError::Open`] - The file or its directory could not be created;
    ///   `cancel` has been fired
    /// - otherwise as [`SinkWriter::write_to`]
    #[instrument(name = "sink_writer", level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn run(
        self,
        queue: Receiver<NewsItem>,
        cancel: CancellationToken,
    ) -> Result<WriteReport, SinkError> {
        let file = match self.open().await {
            Ok(file) => file,
            Err(e) => {
                error!(error = %e, "Cannot open destination; abandoning run");
                cancel.cancel();
                return Err(e);
            }
        };
        self.write_to(file, queue, cancel).await
    }

    /// Drain `queue` into an open destination, then shut it down.
    ///
    /// `out` is released on every exit path. After the last record it is shut
    /// down so close errors are reported rather than lost on drop.
    ///
    /// # Errors
    ///
    /// - [`SinkError::Write`] - A record could not be appended; `cancel` has
    ///   been fired and the remaining queue is discarded
    /// - [`SinkError::Close`] - Closing the destination failed
    pub async fn write_to<W>(
        self,
        mut out: W,
        mut queue: Receiver<NewsItem>,
        cancel: CancellationToken,
    ) -> Result<WriteReport, SinkError>
    where
        W: AsyncWrite + Unpin,
    {
        let report = match self.drain(&mut queue, &mut out).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "Write failed; discarding the rest of the queue");
                cancel.cancel();
                return Err(e);
            }
        };

        out.shutdown().await.map_err(|e| {
            error!(error = %e, "Closing destination failed");
            SinkError::Close(e)
        })?;

        info!(records = report.records, bytes = report.bytes, "Sink writer finished");
        Ok(report)
    }

    async fn open(&self) -> Result<File, SinkError> {
        let open_err = |source| SinkError::Open {
            path: self.path.clone(),
            source,
        };
        ensure_parent_dir(&self.path).await.map_err(open_err)?;
        File::create(&self.path).await.map_err(open_err)
    }

    /// Append every item from `queue` to `out` until end-of-stream.
    ///
    /// Each record is formatted in full before a single `write_all`, so a
    /// failure never leaves a half-formatted line behind from this side. The
    /// destination is flushed after every record so buffered writers such as
    /// [`tokio::fs::File`] report a failed write against its own record.
    pub async fn drain<W>(
        &self,
        queue: &mut Receiver<NewsItem>,
        out: &mut W,
    ) -> Result<WriteReport, SinkError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut report = WriteReport::default();

        while let Some(item) = queue.recv().await {
            let line = format_record(&item, &self.tz);
            let written = async {
                out.write_all(line.as_bytes()).await?;
                out.flush().await
            };
            written.await.map_err(|source| SinkError::Write {
                records: report.records,
                source,
            })?;
            report.records += 1;
            report.bytes += line.len();
            debug!(id = item.id, bytes = line.len(), "Wrote record");
        }

        Ok(report)
    }
}
