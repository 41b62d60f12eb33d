//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// None of these are fatal to the editor: a failed fetch leaves the
/// defaults in place and a failed store means the change did not persist.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote configuration could not be read.
    #[error("failed to fetch remote config {name:?}: {message}")]
    RemoteFetchFailed {
        /// Name of the remote document.
        name: String,
        /// Error message.
        message: String,
    },

    /// The remote configuration could not be written.
    #[error("failed to store remote config {name:?}: {message}")]
    RemoteStoreFailed {
        /// Name of the remote document.
        name: String,
        /// Error message.
        message: String,
    },

    /// No baseline has been captured yet; `install_on` was never called.
    #[error("no baseline captured: install on an editor first")]
    NotInstalled,

    /// No editor is registered with the coordinator.
    #[error("no editor registered")]
    NoEditor,
}

impl SyncError {
    /// Creates a fetch failure.
    pub fn fetch_failed(name: impl Into<String>, message: impl ToString) -> Self {
        Self::RemoteFetchFailed {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Creates a store failure.
    pub fn store_failed(name: impl Into<String>, message: impl ToString) -> Self {
        Self::RemoteStoreFailed {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if the error came from the remote service.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SyncError::RemoteFetchFailed { .. } | SyncError::RemoteStoreFailed { .. }
        )
    }
}
