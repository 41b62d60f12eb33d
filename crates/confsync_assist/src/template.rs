//! Template catalog model.

use crate::error::AssistResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Linked editing positions inside a template, relative to its start.
///
/// Groups nest: each element is a span or another group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Positions {
    /// A single region.
    Span {
        /// Offset of the region.
        offset: usize,
        /// Length of the region.
        length: usize,
    },
    /// A list of spans or nested groups.
    Group(Vec<Positions>),
}

impl Positions {
    /// Returns a copy with every span moved right by `by`.
    #[must_use]
    pub fn shifted(&self, by: usize) -> Positions {
        match self {
            Positions::Span { offset, length } => Positions::Span {
                offset: offset + by,
                length: *length,
            },
            Positions::Group(items) => {
                Positions::Group(items.iter().map(|p| p.shifted(by)).collect())
            }
        }
    }
}

/// A code template offered as a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Word that triggers the template.
    pub trigger: String,
    /// Text inserted when the template is accepted.
    pub proposal: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Where the caret goes after the last position, relative to the template start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape_position: Option<usize>,
    /// Linked editing positions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Positions>,
}

impl Template {
    /// Creates a template with no positions.
    pub fn new(
        trigger: impl Into<String>,
        proposal: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            proposal: proposal.into(),
            description: description.into(),
            escape_position: None,
            positions: None,
        }
    }

    /// Sets the escape position.
    #[must_use]
    pub fn with_escape_position(mut self, position: usize) -> Self {
        self.escape_position = Some(position);
        self
    }

    /// Sets the linked positions.
    #[must_use]
    pub fn with_positions(mut self, positions: Positions) -> Self {
        self.positions = Some(positions);
        self
    }
}

/// Templates grouped by language scope (`"js"`, `"html"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    scopes: BTreeMap<String, Vec<Template>>,
}

impl TemplateCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from JSON.
    pub fn from_json(json: &str) -> AssistResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the catalog to compact JSON.
    pub fn to_json(&self) -> AssistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Appends a template to `scope`.
    pub fn add(&mut self, scope: impl Into<String>, template: Template) {
        self.scopes.entry(scope.into()).or_default().push(template);
    }

    /// Returns the templates of `scope`.
    pub fn templates(&self, scope: &str) -> Option<&[Template]> {
        self.scopes.get(scope).map(Vec::as_slice)
    }

    /// Iterates over scope names.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// Total number of templates.
    pub fn len(&self) -> usize {
        self.scopes.values().map(Vec::len).sum()
    }

    /// Returns true if the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
