//! # confsync Assist
//!
//! Template content assist for the editor.
//!
//! A [`TemplateCatalog`] maps language scopes to code templates. The
//! [`TemplateCache`] loads it once per process from a [`TemplateSource`],
//! optionally keeping a timestamped copy in a local
//! [`EvictingStore`](confsync_storage::EvictingStore) so a restart does
//! not have to ask the source again. A [`TemplateContentAssist`] then turns
//! the templates of one scope into completion [`Proposal`]s for the word
//! being typed.
//!
//! ## Example
//!
//! ```rust
//! use confsync_assist::{
//!     AssistConfig, StaticTemplateSource, Template, TemplateCache, TemplateCatalog,
//!     TemplateContentAssist,
//! };
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut catalog = TemplateCatalog::new();
//! catalog.add("js", Template::new("if", "if () {}", "if statement"));
//!
//! let cache = Arc::new(TemplateCache::new(
//!     StaticTemplateSource::new(catalog),
//!     AssistConfig::default(),
//! ));
//! let assist = TemplateContentAssist::new("js", cache);
//! assist.install().await.unwrap();
//!
//! let proposals = assist.compute_proposals("i", 1);
//! assert_eq!(proposals[0].proposal, "if () {}");
//! # });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod assist;
mod cache;
mod config;
mod error;
mod source;
mod template;

pub use assist::{Proposal, TemplateContentAssist, TEMPLATE_RELEVANCE};
pub use cache::TemplateCache;
pub use config::AssistConfig;
pub use error::{AssistError, AssistResult};
pub use source::{FileTemplateSource, StaticTemplateSource, TemplateSource};
pub use template::{Positions, Template, TemplateCatalog};
