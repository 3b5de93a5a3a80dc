//! Header sniffing for resources with no declared schema.
//!
//! Reads a bounded prefix of the stream, takes the first non-empty CSV
//! record as the header, and drops the stream without consuming the rest
//! of the file.

use std::io::Read;

use tracing::debug;

use crate::error::{IngestError, Result, is_row_local};
use crate::source::Fetcher;

/// How much of the file the sniff may consume.
pub const SNIFF_LIMIT_BYTES: u64 = 1024 * 1024;

/// Reads the header row from the first [`SNIFF_LIMIT_BYTES`] of the resource.
pub fn sniff_header(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<String>> {
    sniff_header_with_limit(fetcher, url, SNIFF_LIMIT_BYTES)
}

/// Sniff with an explicit prefix bound; the stream is never read past it.
pub fn sniff_header_with_limit(
    fetcher: &dyn Fetcher,
    url: &str,
    limit: u64,
) -> Result<Vec<String>> {
    let stream = fetcher.fetch(url)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(stream.take(limit));
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(error) if is_row_local(&error) => {
                debug!(%error, "skipping malformed record while sniffing");
                continue;
            }
            Err(error) => return Err(error.into()),
        };
        if record.iter().any(|cell| !cell.trim().is_empty()) {
            let header: Vec<String> = record.iter().map(str::to_string).collect();
            debug!(columns = header.len(), "sniffed header");
            return Ok(header);
        }
    }
    Err(IngestError::EmptyHeader { limit })
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use super::*;

    struct MemoryFetcher(Vec<u8>);

    impl Fetcher for MemoryFetcher {
        fn fetch(&self, _url: &str) -> Result<Box<dyn Read + Send>> {
            Ok(Box::new(io::Cursor::new(self.0.clone())))
        }
    }

    /// Wraps a reader and counts bytes handed out.
    struct CountingReader<R> {
        inner: R,
        read: Arc<AtomicU64>,
    }

    impl<R: Read> Read for CountingReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.read.fetch_add(n as u64, Ordering::Relaxed);
            Ok(n)
        }
    }

    struct CountingFetcher {
        data: Vec<u8>,
        read: Arc<AtomicU64>,
    }

    impl Fetcher for CountingFetcher {
        fn fetch(&self, _url: &str) -> Result<Box<dyn Read + Send>> {
            Ok(Box::new(CountingReader {
                inner: io::Cursor::new(self.data.clone()),
                read: Arc::clone(&self.read),
            }))
        }
    }

    #[test]
    fn returns_first_row_tokens() {
        let fetcher = MemoryFetcher(b"lat,lon,depth\n1,2,3\n".to_vec());
        let header = sniff_header(&fetcher, "mem://x").expect("header");
        assert_eq!(header, ["lat", "lon", "depth"]);
    }

    #[test]
    fn skips_blank_leading_lines() {
        let fetcher = MemoryFetcher(b"\n\na,b\n1,2\n".to_vec());
        let header = sniff_header(&fetcher, "mem://x").expect("header");
        assert_eq!(header, ["a", "b"]);
    }

    #[test]
    fn skips_malformed_leading_lines() {
        let mut data = b"\xff\xfe\n".to_vec();
        data.extend(b"lat,lon\n1,2\n");
        let fetcher = MemoryFetcher(data);
        let header = sniff_header(&fetcher, "mem://x").expect("header");
        assert_eq!(header, ["lat", "lon"]);
    }

    #[test]
    fn empty_prefix_is_an_error() {
        let fetcher = MemoryFetcher(Vec::new());
        let error = sniff_header(&fetcher, "mem://x").unwrap_err();
        assert!(matches!(error, IngestError::EmptyHeader { .. }));
    }

    #[test]
    fn never_reads_past_the_limit() {
        // 4 KiB of data, 64-byte limit: the sniff must stop at the bound
        // even though the stream has much more to give.
        let mut data = b"a,b\n".to_vec();
        data.extend(std::iter::repeat_n(b"1,2\n".as_slice(), 1024).flatten());
        let read = Arc::new(AtomicU64::new(0));
        let fetcher = CountingFetcher {
            data,
            read: Arc::clone(&read),
        };
        let header = sniff_header_with_limit(&fetcher, "mem://x", 64).expect("header");
        assert_eq!(header, ["a", "b"]);
        assert!(read.load(Ordering::Relaxed) <= 64);
    }
}
