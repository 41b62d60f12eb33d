//! # Confsync Core
//!
//! Configuration documents and the minimal-diff algorithm for confsync.
//!
//! A [`ConfigDocument`] is a flat map from string keys to string values or
//! explicit nulls. [`diff`] computes the smallest [`Patch`] that turns one
//! document into another, so that only user overrides need to be stored
//! remotely; [`apply_patch`] replays a patch onto a document.
//!
//! ## Usage
//!
//! ```
//! use confsync_core::{apply_patch, diff, ConfigDocument};
//!
//! let defaults: ConfigDocument = [("ctrl+s", Some("save"))].into_iter().collect();
//! let mut current = defaults.clone();
//! current.set("ctrl+shift+s", "saveAll");
//!
//! let patch = diff(&defaults, &current);
//! assert_eq!(patch.len(), 1);
//!
//! let mut restored = defaults.clone();
//! apply_patch(&mut restored, &patch);
//! assert_eq!(restored, current);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod diff;
mod document;
mod error;

pub use diff::{apply_patch, diff, Patch};
pub use document::ConfigDocument;
pub use error::{DocumentError, DocumentResult};
