pub mod error;
pub mod sniff;
pub mod source;
pub mod stream;

pub use error::{IngestError, Result};
pub use sniff::{SNIFF_LIMIT_BYTES, sniff_header, sniff_header_with_limit};
pub use source::{DefaultFetcher, Fetcher, FileFetcher, HttpFetcher};
pub use stream::{
    CancelHandle, DEFAULT_BATCH_SIZE, ROW_LIMIT, StreamOptions, StreamOutcome, stream_rows,
};
