//! Minimal patches between flat documents.
//!
//! Only flat documents are supported; this is not a deep merge.

use crate::document::ConfigDocument;

/// A document describing the edit that turns one document into another.
///
/// `Some(v)` entries set a key, `None` entries remove it.
pub type Patch = ConfigDocument;

/// Computes the minimal patch turning `base` into `target`.
///
/// 1. Keys of `base` whose value differs in `target` carry the target value.
/// 2. Keys of `base` missing from `target` carry `None`.
/// 3. Keys only in `target` carry the target value.
///
/// Keys with equal values in both are left out.
///
/// # Example
///
/// ```rust
/// use confsync_core::{diff, ConfigDocument};
///
/// let base: ConfigDocument = [("a", Some("x")), ("b", Some("y"))].into_iter().collect();
/// let target: ConfigDocument = [("a", Some("x")), ("c", Some("z"))].into_iter().collect();
///
/// let patch = diff(&base, &target);
/// assert_eq!(patch.get("a"), None);
/// assert_eq!(patch.get("b"), Some(None));
/// assert_eq!(patch.get("c"), Some(Some("z")));
/// ```
#[must_use]
pub fn diff(base: &ConfigDocument, target: &ConfigDocument) -> Patch {
    let mut patch = Patch::new();

    for (key, base_value) in base.iter() {
        match target.get(key) {
            Some(target_value) if target_value != base_value => {
                patch.insert(key, target_value.map(str::to_string));
            }
            Some(_) => {}
            None => patch.set_null(key),
        }
    }

    for (key, target_value) in target.iter() {
        if !base.contains_key(key) {
            patch.insert(key, target_value.map(str::to_string));
        }
    }

    patch
}

/// Applies `patch` to `doc`: `Some` entries are set, `None` entries removed.
pub fn apply_patch(doc: &mut ConfigDocument, patch: &Patch) {
    for (key, value) in patch.iter() {
        match value {
            Some(value) => doc.set(key, value),
            None => {
                doc.remove(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(pairs: &[(&str, Option<&str>)]) -> ConfigDocument {
        pairs.iter().copied().collect()
    }

    #[test]
    fn diff_of_identical_documents_is_empty() {
        let d = doc(&[("ctrl+s", Some("save")), ("ctrl+q", None)]);
        assert!(diff(&d, &d).is_empty());
    }

    #[test]
    fn diff_reports_changed_removed_and_added() {
        let base = doc(&[("a", Some("x")), ("b", Some("y"))]);
        let target = doc(&[("a", Some("x")), ("c", Some("z"))]);

        let patch = diff(&base, &target);
        assert_eq!(patch, doc(&[("b", None), ("c", Some("z"))]));
    }

    #[test]
    fn diff_carries_changed_value() {
        let base = doc(&[("ctrl+d", Some("deleteLine"))]);
        let target = doc(&[("ctrl+d", Some("duplicateLine"))]);
        assert_eq!(diff(&base, &target), doc(&[("ctrl+d", Some("duplicateLine"))]));
    }

    #[test]
    fn diff_distinguishes_null_from_value() {
        let base = doc(&[("k", Some("v"))]);
        let target = doc(&[("k", None)]);
        assert_eq!(diff(&base, &target), doc(&[("k", None)]));

        let base = doc(&[("k", None)]);
        let target = doc(&[("k", Some("v"))]);
        assert_eq!(diff(&base, &target), doc(&[("k", Some("v"))]));
    }

    #[test]
    fn diff_keeps_null_only_in_target() {
        let base = ConfigDocument::new();
        let target = doc(&[("k", None)]);
        assert_eq!(diff(&base, &target), doc(&[("k", None)]));
    }

    #[test]
    fn apply_patch_reaches_target() {
        let base = doc(&[("a", Some("1")), ("b", Some("2")), ("c", Some("3"))]);
        let target = doc(&[("a", Some("1")), ("b", Some("20")), ("d", Some("4"))]);

        let mut applied = base.clone();
        apply_patch(&mut applied, &diff(&base, &target));
        assert_eq!(applied, target);
    }
}
