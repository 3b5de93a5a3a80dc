use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to download file: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no header row found in the first {limit} bytes of the file")]
    EmptyHeader { limit: u64 },
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// True when a CSV error is confined to a single record (bad encoding,
/// ragged row) rather than the underlying transport. Row-local errors are
/// skipped; transport errors end the stream.
pub(crate) fn is_row_local(error: &csv::Error) -> bool {
    !matches!(error.kind(), csv::ErrorKind::Io(_))
}
