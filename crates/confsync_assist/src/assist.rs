//! Template-based content assist.

use crate::cache::TemplateCache;
use crate::error::AssistResult;
use crate::source::TemplateSource;
use crate::template::{Positions, Template};
use confsync_storage::{Clock, InMemoryMedium, StoreMedium, SystemClock};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Relevance given to every template proposal.
pub const TEMPLATE_RELEVANCE: u32 = 2000;

/// A completion offered to the editor.
///
/// Offsets are absolute positions in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Text to insert.
    pub proposal: String,
    /// Human-readable description.
    pub description: String,
    /// Where the caret goes once the linked positions are done.
    pub escape_position: Option<usize>,
    /// Linked editing positions.
    pub positions: Option<Positions>,
    /// Sort weight among proposals from all providers.
    pub relevance: u32,
    /// Whether the proposal replaces the typed prefix.
    pub replace: bool,
}

impl Proposal {
    fn from_template(template: &Template, offset: usize) -> Self {
        Self {
            proposal: template.proposal.clone(),
            description: template.description.clone(),
            // Zero means the template has no escape position.
            escape_position: template
                .escape_position
                .filter(|&p| p > 0)
                .map(|p| offset + p),
            positions: template.positions.as_ref().map(|p| p.shifted(offset)),
            relevance: TEMPLATE_RELEVANCE,
            replace: true,
        }
    }
}

/// Offers the templates of one language scope as completions.
///
/// Several instances, one per editor, usually share a [`TemplateCache`].
pub struct TemplateContentAssist<S, M = InMemoryMedium, C = SystemClock> {
    scope: String,
    cache: Arc<TemplateCache<S, M, C>>,
}

impl<S: TemplateSource, M: StoreMedium, C: Clock> TemplateContentAssist<S, M, C> {
    /// Creates an assist for `scope` reading from `cache`.
    pub fn new(scope: impl Into<String>, cache: Arc<TemplateCache<S, M, C>>) -> Self {
        Self {
            scope: scope.into(),
            cache,
        }
    }

    /// Returns the language scope.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Makes sure the shared catalog is loaded.
    ///
    /// # Errors
    ///
    /// Returns the load error. Until a load succeeds, no proposals are offered.
    pub async fn install(&self) -> AssistResult<()> {
        if let Err(e) = self.cache.load().await {
            error!(scope = %self.scope, error = %e, "error loading templates");
            return Err(e);
        }
        Ok(())
    }

    /// Returns true once the template catalog is available.
    pub fn is_installed(&self) -> bool {
        self.cache.is_loaded()
    }

    /// Computes proposals for the word `prefix` ending at `invocation_offset`.
    ///
    /// Every template of this scope whose trigger starts with `prefix` is
    /// proposed, in catalog order. Template offsets are moved to start where
    /// `prefix` starts. Offsets count bytes.
    ///
    /// Returns nothing until the catalog is loaded, or if the scope has no
    /// templates.
    pub fn compute_proposals(&self, prefix: &str, invocation_offset: usize) -> Vec<Proposal> {
        let Some(catalog) = self.cache.catalog() else {
            return Vec::new();
        };
        let Some(templates) = catalog.templates(&self.scope) else {
            return Vec::new();
        };

        let offset = invocation_offset.saturating_sub(prefix.len());
        templates
            .iter()
            .filter(|template| template.trigger.starts_with(prefix))
            .map(|template| Proposal::from_template(template, offset))
            .collect()
    }
}
