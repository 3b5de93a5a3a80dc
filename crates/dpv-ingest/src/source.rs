//! Fetch sources for resource URLs.
//!
//! The ingestion engine reads a resource as a plain byte stream; where the
//! bytes come from is behind the [`Fetcher`] trait so tests and local hosts
//! can substitute files or in-memory buffers for HTTP.

use std::fs::File;
use std::io::Read;

use tracing::debug;

use crate::error::Result;

/// Opens a resource URL as a readable byte stream.
///
/// Each call opens a fresh stream; the header sniff and the main parse
/// fetch the same URL independently. Dropping the returned reader releases
/// the underlying transport, which is how streams are cancelled.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>>;
}

/// HTTP(S) fetcher over a blocking reqwest client.
///
/// The response body is read incrementally; nothing is buffered beyond
/// what the CSV reader asks for.
#[derive(Debug, Default)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        debug!(url, "opening http stream");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(Box::new(response))
    }
}

/// Local-file fetcher for `file://` URLs and plain paths.
#[derive(Debug, Default)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        debug!(path, "opening file stream");
        Ok(Box::new(File::open(path)?))
    }
}

/// Picks HTTP or file access from the URL scheme.
#[derive(Debug, Default)]
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.http.fetch(url)
        } else {
            self.file.fetch(url)
        }
    }
}
