//! # confsync Testkit
//!
//! Test utilities for confsync.
//!
//! This crate provides:
//! - Fixtures for clock-driven stores, editors, remotes and listeners
//! - Property-based test generators using proptest
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confsync_testkit::prelude::*;
//!
//! #[test]
//! fn stale_entries_go() {
//!     let mut test = TestStore::new();
//!     test.seed_aged("old", "v", Duration::from_secs(3 * 86_400));
//!     test.store.purge_stale(Duration::from_secs(86_400)).unwrap();
//!     assert!(test.store.is_empty());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
