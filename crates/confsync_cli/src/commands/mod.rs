//! CLI command implementations.

pub mod cache;
pub mod diff;
pub mod keymap;
pub mod templates;
