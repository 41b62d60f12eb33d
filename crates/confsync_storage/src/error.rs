//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// Only [`StoreError::CapacityExceeded`] is recovered by the evicting
/// store. Every other variant propagates to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The medium has no room left for the write.
    #[error("capacity exceeded writing {key:?}: {required} bytes required, quota is {quota}")]
    CapacityExceeded {
        /// The key being written.
        key: String,
        /// Bytes the medium would hold after the write.
        required: usize,
        /// The medium's quota in bytes.
        quota: usize,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted store contents could not be decoded.
    #[error("store corrupted: {0}")]
    Corrupted(String),

    /// The eviction ladder is not strictly decreasing in age.
    #[error("invalid eviction ladder: {0}")]
    InvalidLadder(String),
}

impl StoreError {
    /// Returns true if this error means the medium is full.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_exceeded_is_recognized() {
        let err = StoreError::CapacityExceeded {
            key: "index".into(),
            required: 12,
            quota: 8,
        };
        assert!(err.is_capacity_exceeded());
        assert!(err.to_string().contains("\"index\""));

        let err = StoreError::Corrupted("bad json".into());
        assert!(!err.is_capacity_exceeded());
    }
}
