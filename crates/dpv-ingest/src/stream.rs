//! The main streaming parse.
//!
//! Opens the resource stream, discards the physical header line, parses
//! records incrementally, and hands batches of [`RowRecord`]s to the
//! consumer strictly in order. The consumer can stop the stream from its
//! callback; a [`CancelHandle`] stops it from outside. Both are silent,
//! cooperative cancellations checked between records, since the underlying
//! transport cannot be interrupted mid-read.

use std::mem;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use dpv_model::RowRecord;

use crate::error::{Result, is_row_local};
use crate::source::Fetcher;

/// Hard ceiling on retained rows; past it the dataset is "too large".
pub const ROW_LIMIT: usize = 50_000;

/// Default number of rows per delivered batch.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Options for the streaming parse.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Rows per batch handed to the consumer.
    pub batch_size: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl StreamOptions {
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }
}

/// Cooperative cancellation flag shared with an in-flight stream.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation; the stream stops at the next record boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// How a stream ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The file was read to the end.
    Exhausted,
    /// The consumer's callback broke out of the stream.
    Stopped,
    /// The cancel handle fired.
    Cancelled,
}

/// Streams the resource's data rows to `on_batch`.
///
/// The first physical record is dropped unconditionally as the header
/// line; records whose cells are all empty are skipped. Each surviving
/// record is zipped against `header` into a [`RowRecord`]. Batches are
/// delivered in file order and never overlap: the callback for batch N
/// returns before batch N+1 is assembled.
///
/// Malformed records (bad encoding, unparseable lines) are skipped
/// silently. A transport failure mid-stream propagates as an error; rows
/// already delivered stay with the consumer.
pub fn stream_rows<F>(
    fetcher: &dyn Fetcher,
    url: &str,
    header: &[String],
    options: &StreamOptions,
    cancel: &CancelHandle,
    mut on_batch: F,
) -> Result<StreamOutcome>
where
    F: FnMut(Vec<RowRecord>) -> ControlFlow<()>,
{
    info!(url, columns = header.len(), "starting streaming parse");
    let stream = fetcher.fetch(url)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(stream);

    let mut batch: Vec<RowRecord> = Vec::with_capacity(options.batch_size);
    let mut delivered = 0usize;
    let mut header_line_dropped = false;
    for record in reader.records() {
        if cancel.is_cancelled() {
            debug!(delivered, "stream cancelled");
            return Ok(StreamOutcome::Cancelled);
        }
        let record = match record {
            Ok(record) => record,
            Err(error) if is_row_local(&error) => {
                debug!(%error, "skipping malformed record");
                // A malformed first line still counts as the header line.
                header_line_dropped = true;
                continue;
            }
            Err(error) => return Err(error.into()),
        };
        if !header_line_dropped {
            header_line_dropped = true;
            continue;
        }
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        batch.push(RowRecord::from_cells(header, record.iter()));
        if batch.len() >= options.batch_size {
            delivered += batch.len();
            if on_batch(mem::take(&mut batch)).is_break() {
                debug!(delivered, "consumer stopped the stream");
                return Ok(StreamOutcome::Stopped);
            }
        }
    }
    if !batch.is_empty() {
        delivered += batch.len();
        if on_batch(batch).is_break() {
            debug!(delivered, "consumer stopped the stream");
            return Ok(StreamOutcome::Stopped);
        }
    }
    info!(delivered, "stream exhausted");
    Ok(StreamOutcome::Exhausted)
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::*;

    struct MemoryFetcher(Vec<u8>);

    impl Fetcher for MemoryFetcher {
        fn fetch(&self, _url: &str) -> Result<Box<dyn Read + Send>> {
            Ok(Box::new(io::Cursor::new(self.0.clone())))
        }
    }

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn collect_rows(csv: &[u8], options: &StreamOptions) -> (Vec<RowRecord>, StreamOutcome) {
        let fetcher = MemoryFetcher(csv.to_vec());
        let mut rows = Vec::new();
        let outcome = stream_rows(
            &fetcher,
            "mem://x",
            &header(&["a", "b"]),
            options,
            &CancelHandle::new(),
            |batch| {
                rows.extend(batch);
                ControlFlow::Continue(())
            },
        )
        .expect("stream");
        (rows, outcome)
    }

    #[test]
    fn header_line_never_appears_as_data() {
        let (rows, outcome) = collect_rows(b"a,b\n1,2\n3,4\n", &StreamOptions::default());
        assert_eq!(outcome, StreamOutcome::Exhausted);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[1].get("a"), Some("3"));
        assert_eq!(rows[1].get("b"), Some("4"));
    }

    #[test]
    fn first_line_is_dropped_even_without_header_content() {
        // The engine never inspects the first record; whatever it holds
        // is discarded as the header line.
        let (rows, _) = collect_rows(b"9,9\n1,2\n", &StreamOptions::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some("1"));
    }

    #[test]
    fn all_empty_records_are_skipped() {
        let (rows, _) = collect_rows(b"a,b\n1,2\n,\n  ,\n3,4\n", &StreamOptions::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("a"), Some("3"));
    }

    #[test]
    fn malformed_line_is_skipped_silently() {
        let mut data = b"a,b\n1,2\n".to_vec();
        data.extend(b"\xff\xfe,bad\n");
        data.extend(b"3,4\n");
        let (rows, outcome) = collect_rows(&data, &StreamOptions::default());
        assert_eq!(outcome, StreamOutcome::Exhausted);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some("1"));
        assert_eq!(rows[0].get("b"), Some("2"));
        assert_eq!(rows[1].get("a"), Some("3"));
        assert_eq!(rows[1].get("b"), Some("4"));
    }

    #[test]
    fn malformed_first_line_still_counts_as_the_header_line() {
        let mut data = b"\xff\xfe\n".to_vec();
        data.extend(b"1,2\n3,4\n");
        let (rows, _) = collect_rows(&data, &StreamOptions::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some("1"));
    }

    #[test]
    fn batches_arrive_in_order_with_requested_size() {
        let mut data = b"a,b\n".to_vec();
        for i in 0..10 {
            data.extend(format!("{i},x\n").into_bytes());
        }
        let fetcher = MemoryFetcher(data);
        let mut sizes = Vec::new();
        let mut first_cells = Vec::new();
        let outcome = stream_rows(
            &fetcher,
            "mem://x",
            &header(&["a", "b"]),
            &StreamOptions::default().with_batch_size(4),
            &CancelHandle::new(),
            |batch| {
                sizes.push(batch.len());
                first_cells.push(batch[0].get("a").unwrap().to_string());
                ControlFlow::Continue(())
            },
        )
        .expect("stream");
        assert_eq!(outcome, StreamOutcome::Exhausted);
        assert_eq!(sizes, [4, 4, 2]);
        assert_eq!(first_cells, ["0", "4", "8"]);
    }

    #[test]
    fn consumer_break_stops_the_stream() {
        let mut data = b"a,b\n".to_vec();
        for i in 0..100 {
            data.extend(format!("{i},x\n").into_bytes());
        }
        let fetcher = MemoryFetcher(data);
        let mut seen = 0usize;
        let outcome = stream_rows(
            &fetcher,
            "mem://x",
            &header(&["a", "b"]),
            &StreamOptions::default().with_batch_size(10),
            &CancelHandle::new(),
            |batch| {
                seen += batch.len();
                ControlFlow::Break(())
            },
        )
        .expect("stream");
        assert_eq!(outcome, StreamOutcome::Stopped);
        assert_eq!(seen, 10);
    }

    #[test]
    fn cancel_handle_stops_between_records() {
        let mut data = b"a,b\n".to_vec();
        for i in 0..100 {
            data.extend(format!("{i},x\n").into_bytes());
        }
        let fetcher = MemoryFetcher(data);
        let cancel = CancelHandle::new();
        let mut batches = 0usize;
        let cancel_inner = cancel.clone();
        let outcome = stream_rows(
            &fetcher,
            "mem://x",
            &header(&["a", "b"]),
            &StreamOptions::default().with_batch_size(10),
            &cancel,
            |_| {
                batches += 1;
                cancel_inner.cancel();
                ControlFlow::Continue(())
            },
        )
        .expect("stream");
        assert_eq!(outcome, StreamOutcome::Cancelled);
        assert_eq!(batches, 1);
    }

    #[test]
    fn transport_failure_mid_stream_propagates() {
        /// Yields some valid CSV, then an io error instead of EOF.
        struct BrokenReader(io::Cursor<Vec<u8>>);

        impl Read for BrokenReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let n = self.0.read(buf)?;
                if n == 0 {
                    return Err(io::Error::other("connection reset"));
                }
                Ok(n)
            }
        }

        struct BrokenFetcher;

        impl Fetcher for BrokenFetcher {
            fn fetch(&self, _url: &str) -> Result<Box<dyn Read + Send>> {
                Ok(Box::new(BrokenReader(io::Cursor::new(
                    b"a,b\n1,2\n3,4\n".to_vec(),
                ))))
            }
        }

        let mut rows = Vec::new();
        let result = stream_rows(
            &BrokenFetcher,
            "mem://x",
            &header(&["a", "b"]),
            &StreamOptions::default().with_batch_size(1),
            &CancelHandle::new(),
            |batch| {
                rows.extend(batch);
                ControlFlow::Continue(())
            },
        );
        assert!(result.is_err());
        // Rows delivered before the failure stay delivered.
        assert_eq!(rows.len(), 2);
    }
}
