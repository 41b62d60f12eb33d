//! Error types for the core crate.

use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur while reading or writing documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input is not a flat JSON object of strings and nulls.
    #[error("invalid configuration document: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document could not be serialized.
    #[error("failed to encode configuration document: {0}")]
    Encode(#[source] serde_json::Error),
}
