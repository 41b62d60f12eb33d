//! Store medium trait definition.

use crate::error::StoreResult;

/// A synchronous, quota-limited key/value persistence medium.
///
/// Media are **opaque string stores**. They know nothing about timestamps,
/// eviction or retries; the [`super::EvictingStore`] owns all of that.
///
/// # Invariants
///
/// - `get` never fails; a missing key reads as `None`
/// - `set` fails with [`super::StoreError::CapacityExceeded`] when the
///   write would not fit, and leaves the previous value in place
/// - `key(i)` for `i < len()` enumerates every stored key exactly once,
///   as long as the medium is not mutated in between
///
/// # Implementors
///
/// - [`super::InMemoryMedium`] - For testing, with a simulated quota
/// - [`super::FileMedium`] - A JSON file on disk
pub trait StoreMedium: Send {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the medium is full, or an I/O error
    /// if the medium could not be written.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be written.
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Returns the key at position `index`, if any.
    fn key(&self, index: usize) -> Option<String>;

    /// Returns the number of stored keys.
    fn len(&self) -> usize;

    /// Returns true if the medium holds no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
