//! Error types for content assist.

use confsync_storage::StoreError;
use thiserror::Error;

/// Result type for content assist operations.
pub type AssistResult<T> = Result<T, AssistError>;

/// Errors that can occur while loading or caching templates.
#[derive(Error, Debug)]
pub enum AssistError {
    /// The template source could not produce a catalog.
    #[error("failed to load templates: {0}")]
    LoadFailed(String),

    /// The catalog JSON was malformed.
    #[error("invalid template catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    /// The local cache failed.
    #[error("template cache error: {0}")]
    Store(#[from] StoreError),
}

impl AssistError {
    /// Creates a load failure.
    pub fn load_failed(message: impl ToString) -> Self {
        Self::LoadFailed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_convert() {
        let err: AssistError = StoreError::Corrupted("bad".into()).into();
        assert!(matches!(err, AssistError::Store(_)));
        assert!(err.to_string().starts_with("template cache error"));
    }
}
