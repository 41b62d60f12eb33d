//! Evicting store wrapper.
//!
//! This module wraps any [`StoreMedium`] with a retry-and-evict write path.
//!
//! ## Timestamp Convention
//!
//! A key `k` may have a companion `k-ts` holding the decimal millisecond
//! time `k` was written. Only companions drive eviction:
//!
//! - `k-ts` older than the threshold: both `k-ts` and `k` are purged
//! - `k-ts` not a number: treated as stale and purged
//! - `k` without a companion: never purged by a sweep
//!
//! ## Write Paths
//!
//! - [`EvictingStore::write`] tries once and drops the write if the
//!   medium is full
//! - [`EvictingStore::write_safely`] purges progressively younger entries
//!   on each capacity failure before falling back to `write`

use crate::backend::StoreMedium;
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

/// What happened to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value is in the store.
    Stored {
        /// Purge sweeps that ran before the write fit.
        purges: usize,
    },
    /// The medium was full and the write was discarded.
    Dropped,
}

impl WriteOutcome {
    /// Returns true if the value was written.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        matches!(self, WriteOutcome::Stored { .. })
    }
}

/// Result of a purge sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Keys removed by the sweep, primary keys and companions alike.
    pub removed: Vec<String>,
}

impl PurgeReport {
    /// Number of keys removed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.removed.len()
    }

    /// Returns true if nothing was removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// A key/value store that evicts timestamped entries when its medium fills up.
///
/// # Example
///
/// ```rust
/// use confsync_storage::{EvictingStore, InMemoryMedium};
///
/// let mut store = EvictingStore::new(InMemoryMedium::with_quota(1024));
/// store.write_entry("index", "[1, 2, 3]").unwrap();
/// assert_eq!(store.get("index").as_deref(), Some("[1, 2, 3]"));
/// assert!(store.timestamp_of("index").is_some());
/// ```
#[derive(Debug)]
pub struct EvictingStore<M, C = SystemClock> {
    medium: M,
    config: StoreConfig,
    clock: C,
}

impl<M: StoreMedium> EvictingStore<M> {
    /// Wraps `medium` with the default configuration and the system clock.
    pub fn new(medium: M) -> Self {
        Self::with_config(medium, StoreConfig::default())
    }

    /// Wraps `medium` with `config` and the system clock.
    pub fn with_config(medium: M, config: StoreConfig) -> Self {
        Self::with_clock(medium, config, SystemClock)
    }
}

impl<M: StoreMedium, C: Clock> EvictingStore<M, C> {
    /// Wraps `medium` with `config`, stamping entries with `clock`.
    pub fn with_clock(medium: M, config: StoreConfig, clock: C) -> Self {
        Self {
            medium,
            config,
            clock,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the underlying medium.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Returns the underlying medium mutably.
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Unwraps the underlying medium.
    pub fn into_inner(self) -> M {
        self.medium
    }

    /// Reads `key` straight from the medium.
    pub fn get(&self, key: &str) -> Option<String> {
        self.medium.get(key)
    }

    /// Writes once; a full medium drops the write.
    ///
    /// Meant for low-value data that is cheap to recompute.
    ///
    /// # Errors
    ///
    /// Returns medium errors other than `CapacityExceeded`.
    pub fn write(&mut self, key: &str, value: &str) -> StoreResult<WriteOutcome> {
        self.best_effort(key, value, 0)
    }

    /// Writes, purging stale entries on each capacity failure.
    ///
    /// The n-th failure purges with the n-th ladder threshold and tries
    /// again. Once `max_attempts` failures have been seen, or the ladder
    /// runs out, the write falls back to [`Self::write`].
    ///
    /// # Errors
    ///
    /// Returns medium errors other than `CapacityExceeded`.
    pub fn write_safely(&mut self, key: &str, value: &str) -> StoreResult<WriteOutcome> {
        let mut attempt = 0;

        loop {
            if attempt >= self.config.max_attempts {
                warn!(key, attempts = attempt, "tried too many times, falling back to best-effort write");
                return self.best_effort(key, value, attempt);
            }

            match self.medium.set(key, value) {
                Ok(()) => return Ok(WriteOutcome::Stored { purges: attempt }),
                Err(e) if e.is_capacity_exceeded() => {
                    warn!(
                        key,
                        value_len = value.len(),
                        error = %e,
                        "store quota exceeded, purging and trying again"
                    );

                    let Some(threshold) = self.config.ladder.at(attempt).cloned() else {
                        return self.best_effort(key, value, attempt);
                    };

                    warn!(threshold = %threshold.label, "purging keys that are {} old or older", threshold.label);
                    self.purge_stale(threshold.max_age)?;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Writes `value` under `key` and stamps it with the current time.
    ///
    /// Any previous entry for `key` is removed first, so its space is
    /// free for the new value. Both writes then go through
    /// [`Self::write_safely`], timestamp first. If either is dropped,
    /// nothing is left under `key` or its companion.
    ///
    /// # Errors
    ///
    /// Returns medium errors other than `CapacityExceeded`.
    pub fn write_entry(&mut self, key: &str, value: &str) -> StoreResult<WriteOutcome> {
        let stamp = self.current_timestamp().to_string();
        let ts_key = self.timestamp_key(key);
        self.remove_entry(key)?;

        let WriteOutcome::Stored { purges: stamp_purges } = self.write_safely(&ts_key, &stamp)? else {
            return Ok(WriteOutcome::Dropped);
        };

        match self.write_safely(key, value)? {
            WriteOutcome::Stored { purges } => Ok(WriteOutcome::Stored {
                purges: stamp_purges + purges,
            }),
            WriteOutcome::Dropped => {
                self.remove_entry(key)?;
                Ok(WriteOutcome::Dropped)
            }
        }
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be written.
    pub fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.medium.remove(key)
    }

    /// Removes `key` and its timestamp companion.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be written.
    pub fn remove_entry(&mut self, key: &str) -> StoreResult<()> {
        let ts_key = self.timestamp_key(key);
        self.medium.remove(key)?;
        self.medium.remove(&ts_key)
    }

    /// Returns the stored timestamp for `key`, if present and well-formed.
    pub fn timestamp_of(&self, key: &str) -> Option<u64> {
        self.medium
            .get(&self.timestamp_key(key))
            .and_then(|raw| parse_timestamp(&raw))
    }

    /// Returns true if `key` has a timestamp no older than `max_age`.
    pub fn is_fresh(&self, key: &str, max_age: Duration) -> bool {
        self.timestamp_of(key)
            .is_some_and(|ts| !is_older_than(ts, self.current_timestamp(), max_age))
    }

    /// Removes every timestamped entry older than `max_age`.
    ///
    /// Keys are collected in one pass over the medium and removed in a
    /// second, so removal never shifts the enumeration being walked.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium could not be written.
    pub fn purge_stale(&mut self, max_age: Duration) -> StoreResult<PurgeReport> {
        let now = self.current_timestamp();
        let suffix = self.config.timestamp_suffix.as_str();
        let mut to_purge: Vec<String> = Vec::new();

        for index in 0..self.medium.len() {
            let Some(key) = self.medium.key(index) else {
                continue;
            };
            let Some(primary) = key.strip_suffix(suffix) else {
                continue;
            };

            let stale = match self.medium.get(&key).as_deref().and_then(parse_timestamp) {
                Some(ts) => is_older_than(ts, now, max_age),
                None => true,
            };
            if !stale {
                continue;
            }

            let primary = primary.to_string();
            to_purge.push(key);
            if self.medium.get(&primary).is_some() && !to_purge.contains(&primary) {
                to_purge.push(primary);
            }
        }

        warn!(count = to_purge.len(), "purging keys from store");
        for key in &to_purge {
            self.medium.remove(key)?;
        }

        Ok(PurgeReport { removed: to_purge })
    }

    /// Returns the current time in milliseconds from the store's clock.
    pub fn current_timestamp(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Returns every key in medium order.
    pub fn keys(&self) -> Vec<String> {
        (0..self.medium.len())
            .filter_map(|i| self.medium.key(i))
            .collect()
    }

    /// Returns the number of keys, companions included.
    pub fn len(&self) -> usize {
        self.medium.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.medium.is_empty()
    }

    /// Length of the store serialized as a JSON object.
    ///
    /// Walks and serializes every entry; only meant for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn size_in_bytes(&self) -> StoreResult<usize> {
        let entries: BTreeMap<String, String> = self
            .keys()
            .into_iter()
            .filter_map(|k| self.medium.get(&k).map(|v| (k, v)))
            .collect();
        let json = serde_json::to_string(&entries)
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        Ok(json.len())
    }

    fn timestamp_key(&self, key: &str) -> String {
        format!("{key}{}", self.config.timestamp_suffix)
    }

    fn best_effort(&mut self, key: &str, value: &str, purges: usize) -> StoreResult<WriteOutcome> {
        match self.medium.set(key, value) {
            Ok(()) => Ok(WriteOutcome::Stored { purges }),
            Err(e) if e.is_capacity_exceeded() => {
                warn!(
                    key,
                    value_len = value.len(),
                    error = %e,
                    "store quota exceeded, ignoring write"
                );
                Ok(WriteOutcome::Dropped)
            }
            Err(e) => Err(e),
        }
    }
}

/// Parses a stored timestamp. Anything but a plain unsigned integer is malformed.
fn parse_timestamp(raw: &str) -> Option<u64> {
    let parsed = raw.trim().parse::<u64>().ok();
    if parsed.is_none() {
        debug!(raw, "malformed timestamp treated as stale");
    }
    parsed
}

fn is_older_than(ts: u64, now: u64, max_age: Duration) -> bool {
    u128::from(now.saturating_sub(ts)) > max_age.as_millis()
}
