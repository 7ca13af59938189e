//! Streaming a page body into the filter queue.

use bytes::Bytes;
use chatgrep_types::{ProgressState, Record};
use futures::TryStreamExt;
use std::io;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;

use crate::{ArchiveClient, FetchError};

/// What a finished pump observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpSummary {
    /// Records pushed into the queue.
    pub lines: u64,
    /// Bytes read from the body, line terminators included.
    pub bytes: u64,
    /// Whether the pump stopped before the body was exhausted.
    pub cancelled: bool,
}

/// An open page response whose body has not been read yet.
#[derive(Debug)]
pub struct PageStream {
    url: String,
    response: reqwest::Response,
}

impl PageStream {
    /// Requests a page.
    ///
    /// Nothing is emitted on failure; the caller decides what a failed page
    /// means for its channel.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn open(client: &ArchiveClient, url: &str) -> Result<Self, FetchError> {
        tracing::debug!(%url, "opening page");
        let response = client.get(url).await?;
        Ok(Self {
            url: url.to_string(),
            response,
        })
    }

    /// Reads the body line by line, pushing one [`Record`] per line into
    /// `output` in body order.
    ///
    /// `cancel` is checked at every line boundary; once set, no further record
    /// is pushed and the rest of the body is dropped unread. A closed `output`
    /// queue is treated the same way. Returning drops the body and with it the
    /// connection, on every path. Each line read is counted in `progress`
    /// before it is queued.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Body`] if reading the body fails mid-stream.
    /// Records queued before the failure stay delivered.
    pub async fn pump(
        self,
        output: mpsc::Sender<Record>,
        cancel: CancellationToken,
        progress: Arc<ProgressState>,
    ) -> Result<PumpSummary, FetchError> {
        let body = Box::pin(self.response.bytes_stream().map_err(io::Error::other));
        let mut reader: StreamReader<_, Bytes> = StreamReader::new(body);
        let mut summary = PumpSummary::default();
        let mut buf = Vec::new();

        loop {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            buf.clear();
            let read = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    summary.cancelled = true;
                    break;
                }
                read = reader.read_until(b'\n', &mut buf) => read.map_err(FetchError::Body)?,
            };
            if read == 0 {
                break;
            }

            progress.record_line(read);
            summary.lines += 1;
            summary.bytes += read as u64;

            let line = trim_line_end(&buf);
            let record = Record::parse(line);
            if output.send(record).await.is_err() {
                // The consumer is gone: it reached a terminal outcome.
                summary.cancelled = true;
                break;
            }
        }

        tracing::debug!(
            url = %self.url,
            lines = summary.lines,
            bytes = summary.bytes,
            cancelled = summary.cancelled,
            "page stream finished"
        );
        Ok(summary)
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
