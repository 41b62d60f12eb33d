//! Flat configuration documents.

use crate::error::{DocumentError, DocumentResult};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// A flat mapping from string keys to string values or explicit nulls.
///
/// `None` is a real value meaning "explicitly unbound", which is not the
/// same as the key being absent. In JSON the two are `{"k": null}` and
/// `{}` respectively. Nested values are rejected when parsing.
///
/// Keys are kept sorted, so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    entries: BTreeMap<String, Option<String>>,
}

impl ConfigDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is an object whose values are all
    /// strings or `null`.
    pub fn from_json(bytes: &[u8]) -> DocumentResult<Self> {
        serde_json::from_slice(bytes).map_err(DocumentError::Parse)
    }

    /// Serializes the document as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DocumentResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(DocumentError::Encode)
    }

    /// Serializes the document as indented JSON, suitable for a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> DocumentResult<String> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Encode)
    }

    /// Sets `key` to `value`, returning the previous entry if there was one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Option<String>,
    ) -> Option<Option<String>> {
        self.entries.insert(key.into(), value)
    }

    /// Sets `key` to a string value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Some(value.into()));
    }

    /// Sets `key` to an explicit null.
    pub fn set_null(&mut self, key: impl Into<String>) {
        self.entries.insert(key.into(), None);
    }

    /// Removes `key` entirely, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.entries.remove(key)
    }

    /// Returns the entry for `key`.
    ///
    /// `None` means absent; `Some(None)` means explicitly null.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(key).map(Option::as_deref)
    }

    /// Returns the string value for `key`, treating null and absent alike.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// Returns true if `key` is present, null or not.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Iterates keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for ConfigDocument
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

impl IntoIterator for ConfigDocument {
    type Item = (String, Option<String>);
    type IntoIter = btree_map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<BTreeMap<String, Option<String>>> for ConfigDocument {
    fn from(entries: BTreeMap<String, Option<String>>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_absent_are_distinct() {
        let mut doc = ConfigDocument::new();
        doc.set_null("ctrl+d");

        assert!(doc.contains_key("ctrl+d"));
        assert_eq!(doc.get("ctrl+d"), Some(None));
        assert_eq!(doc.get("ctrl+e"), None);
        assert_eq!(doc.value("ctrl+d"), None);
    }

    #[test]
    fn json_keeps_explicit_nulls() {
        let doc: ConfigDocument = [("a", Some("x")), ("b", None)].into_iter().collect();
        let json = doc.to_json().unwrap();
        assert_eq!(json, br#"{"a":"x","b":null}"#);

        let parsed = ConfigDocument::from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn json_rejects_nested_values() {
        let result = ConfigDocument::from_json(br#"{"a": {"b": "c"}}"#);
        assert!(matches!(result, Err(DocumentError::Parse(_))));

        let result = ConfigDocument::from_json(br#"{"a": 1}"#);
        assert!(result.is_err());

        let result = ConfigDocument::from_json(br#"["a"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut doc = ConfigDocument::new();
        doc.set("k", "first");
        let previous = doc.insert("k", Some("second".into()));
        assert_eq!(previous, Some(Some("first".to_string())));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.value("k"), Some("second"));
    }

    #[test]
    fn iteration_is_sorted() {
        let doc: ConfigDocument = [("b", Some("2")), ("a", Some("1"))].into_iter().collect();
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(keys, ["a", "b"]);
    }
}
