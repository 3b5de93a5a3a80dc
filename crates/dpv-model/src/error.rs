use thiserror::Error;

/// Input-validation errors raised before any network access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Missing resources key in the datapackage")]
    MissingResources,
    #[error("There are no resources in the datapackage")]
    EmptyResources,
    #[error("Resource has no download path")]
    MissingPath,
}

pub type Result<T> = std::result::Result<T, DocumentError>;
