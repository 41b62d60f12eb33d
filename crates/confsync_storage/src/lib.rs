//! # Confsync Storage
//!
//! Quota-bounded key/value cache with age-based eviction.
//!
//! This crate provides the local cache used by confsync. A [`StoreMedium`]
//! is a plain string store that may refuse writes when it is full; the
//! [`EvictingStore`] wraps one and reacts to capacity failures by purging
//! progressively younger timestamped entries before retrying.
//!
//! ## Design Principles
//!
//! - Media are dumb string stores (get, set, remove, enumerate)
//! - Capacity exhaustion is the only recovered failure
//! - Eviction is driven only by `-ts` timestamp companions
//! - Retries are bounded by an explicit attempt counter
//!
//! ## Available Media
//!
//! - [`InMemoryMedium`] - For testing, with a simulated byte quota
//! - [`FileMedium`] - A JSON object persisted on disk
//!
//! ## Example
//!
//! ```rust
//! use confsync_storage::{EvictingStore, InMemoryMedium};
//!
//! let mut store = EvictingStore::new(InMemoryMedium::with_quota(4096));
//! store.write_safely("greeting", "hello").unwrap();
//! assert_eq!(store.get("greeting").as_deref(), Some("hello"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod clock;
mod config;
mod error;
mod evicting;
mod file;
mod ladder;
mod memory;

pub use backend::StoreMedium;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use evicting::{EvictingStore, PurgeReport, WriteOutcome};
pub use file::FileMedium;
pub use ladder::{EvictionLadder, EvictionThreshold};
pub use memory::InMemoryMedium;
