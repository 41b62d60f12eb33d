//! # confsync Engine
//!
//! Keeps an editor's key bindings in step with a per-user remote
//! configuration document.
//!
//! This crate provides:
//! - The editor surface abstraction and an in-memory editor
//! - The remote configuration service abstraction, with in-memory and
//!   directory-backed implementations
//! - A session-scoped baseline of default bindings
//! - The binding synchronization coordinator
//!
//! ## Architecture
//!
//! The remote document holds only the user's overrides:
//! 1. On first install, the editor's default bindings are captured as the
//!    session baseline
//! 2. The remote overrides are fetched and applied on top of the defaults
//! 3. Each change stores `diff(baseline, current)` as the new remote document
//!
//! ## Key Invariants
//!
//! - The baseline is captured once per session and never changes
//! - The remote document is replaced on every persist, never merged
//! - A failed fetch leaves the editor on its defaults
//! - Remote document names are namespaced by platform

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coordinator;
mod dir;
mod editor;
mod error;
mod notify;
mod remote;
mod session;

pub use config::{Platform, SyncConfig};
pub use coordinator::{BindingSyncCoordinator, CoordinatorState, SyncStats};
pub use dir::DirRemoteConfig;
pub use editor::{unbound_action_names, EditorSurface, MemoryEditor};
pub use error::{SyncError, SyncResult};
pub use notify::BindingListener;
pub use remote::{MemoryRemoteConfig, RemoteConfigService};
pub use session::{Baseline, SyncSession};
