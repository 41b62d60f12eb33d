//! Eviction threshold ladder.

use crate::error::{StoreError, StoreResult};
use std::time::Duration;

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(60 * 60 * 24);

/// One rung of the ladder: entries older than `max_age` are purged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionThreshold {
    /// Human-readable description used in log messages.
    pub label: String,
    /// Entries with a timestamp older than this are stale.
    pub max_age: Duration,
}

impl EvictionThreshold {
    /// Creates a threshold.
    pub fn new(label: impl Into<String>, max_age: Duration) -> Self {
        Self {
            label: label.into(),
            max_age,
        }
    }
}

/// Thresholds ordered from most permissive to most aggressive.
///
/// Consulted by depth: the n-th consecutive capacity failure purges with
/// the n-th threshold. Ages are strictly decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionLadder {
    thresholds: Vec<EvictionThreshold>,
}

impl EvictionLadder {
    /// Creates a ladder from thresholds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidLadder`] if the ladder is empty or the
    /// ages are not strictly decreasing.
    pub fn new(thresholds: Vec<EvictionThreshold>) -> StoreResult<Self> {
        if thresholds.is_empty() {
            return Err(StoreError::InvalidLadder("ladder has no thresholds".into()));
        }
        for pair in thresholds.windows(2) {
            if pair[1].max_age >= pair[0].max_age {
                return Err(StoreError::InvalidLadder(format!(
                    "{:?} ({:?}) must be younger than {:?} ({:?})",
                    pair[1].label, pair[1].max_age, pair[0].label, pair[0].max_age
                )));
            }
        }
        Ok(Self { thresholds })
    }

    /// The standard five-step ladder, two days down to two minutes.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            thresholds: vec![
                EvictionThreshold::new("two days", DAY * 2),
                EvictionThreshold::new("one day", DAY),
                EvictionThreshold::new("six hours", HOUR * 6),
                EvictionThreshold::new("one hour", HOUR),
                EvictionThreshold::new("two minutes", MINUTE * 2),
            ],
        }
    }

    /// Returns the threshold at `depth`, if the ladder is that deep.
    #[must_use]
    pub fn at(&self, depth: usize) -> Option<&EvictionThreshold> {
        self.thresholds.get(depth)
    }

    /// Returns the number of rungs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Always false; a ladder has at least one rung.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Iterates thresholds from most permissive to most aggressive.
    pub fn iter(&self) -> impl Iterator<Item = &EvictionThreshold> {
        self.thresholds.iter()
    }
}

impl Default for EvictionLadder {
    fn default() -> Self {
        Self::standard()
    }
}
