//! In-memory store medium with a simulated quota.

use crate::backend::StoreMedium;
use crate::error::{StoreError, StoreResult};
use std::collections::BTreeMap;

/// An in-memory store medium.
///
/// Usage is measured as the total byte length of all keys and values.
/// When a quota is set, any write that would push usage past it fails
/// with [`StoreError::CapacityExceeded`], the way a browser's local
/// storage does.
///
/// # Example
///
/// ```rust
/// use confsync_storage::{InMemoryMedium, StoreMedium};
///
/// let mut medium = InMemoryMedium::with_quota(16);
/// medium.set("a", "1234").unwrap();
/// assert!(medium.set("b", "a value that will not fit").is_err());
/// assert_eq!(medium.get("a").as_deref(), Some("1234"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryMedium {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
    write_attempts: usize,
}

impl InMemoryMedium {
    /// Creates an empty medium with no quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty medium that holds at most `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Creates a medium that rejects every non-empty write.
    #[must_use]
    pub fn full() -> Self {
        Self::with_quota(0)
    }

    /// Creates a medium pre-loaded with entries, bypassing the quota.
    ///
    /// Useful for testing eviction scenarios.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Sets or clears the quota.
    pub fn set_quota(&mut self, quota: Option<usize>) {
        self.quota = quota;
    }

    /// Returns the bytes currently used by keys and values.
    #[must_use]
    pub fn usage(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Returns how many times `set` has been called, successful or not.
    #[must_use]
    pub fn write_attempts(&self) -> usize {
        self.write_attempts
    }

    /// Returns the quota, if any.
    #[must_use]
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Inserts without checking the quota or counting a write attempt.
    ///
    /// Useful for seeding eviction scenarios after construction.
    pub fn insert_unchecked(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }
}

impl StoreMedium for InMemoryMedium {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.write_attempts += 1;

        if let Some(quota) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let required = self.usage() - replaced + key.len() + value.len();
            if required > quota {
                return Err(StoreError::CapacityExceeded {
                    key: key.to_string(),
                    required,
                    quota,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn key(&self, index: usize) -> Option<String> {
        self.entries.keys().nth(index).cloned()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
