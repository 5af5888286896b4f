// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Symbol references and reference-set propagation.
//!
//! A [`Reference`] names a target-language symbol together with the module
//! that defines it. Every compiled fragment carries a [`ReferenceSet`]; when
//! a fragment embeds a child fragment it merges the child's set into its
//! own, so the root of any expression tree knows the complete import set it
//! needs to stand alone.

use std::collections::BTreeSet;

/// A reference to a target-language symbol.
///
/// Identity (ordering, equality, hashing) is structural on
/// `(module_path, name)`: two references to the same symbol with different
/// attribute paths or aliases are the same import.
#[derive(Debug, Clone)]
pub struct Reference {
    /// The imported symbol name, e.g. `"Inputs"`.
    pub name: String,

    /// Module path segments of the defining module, e.g. `["inputs"]`.
    pub module_path: Vec<String>,

    /// Attribute access chain applied at the point of use,
    /// e.g. `["my_input"]` for `Inputs.my_input`.
    pub attribute_path: Option<Vec<String>>,

    /// Import alias, when the symbol must be renamed at the import site.
    pub alias: Option<String>,
}

impl Reference {
    /// Create a reference to `name` defined in `module_path`.
    pub fn new(name: impl Into<String>, module_path: &[&str]) -> Self {
        Self {
            name: name.into(),
            module_path: module_path.iter().map(|s| s.to_string()).collect(),
            attribute_path: None,
            alias: None,
        }
    }

    /// Attach an attribute access chain to this reference.
    pub fn with_attributes(mut self, attributes: &[&str]) -> Self {
        self.attribute_path = Some(attributes.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Attach an import alias to this reference.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn identity(&self) -> (&[String], &str) {
        (&self.module_path, &self.name)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Reference {}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module_path.join("."), self.name)
    }
}

/// A deduplicated set of [`Reference`]s.
///
/// Merging is a pure union; the completeness property (root set equals the
/// union over all leaves) follows from every embed site calling
/// [`ReferenceSet::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    entries: BTreeSet<Reference>,
}

impl ReferenceSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single reference.
    pub fn single(reference: Reference) -> Self {
        let mut set = Self::new();
        set.insert(reference);
        set
    }

    /// Insert one reference, deduplicating by `(module_path, name)`.
    pub fn insert(&mut self, reference: Reference) {
        self.entries.insert(reference);
    }

    /// Union `other` into this set.
    pub fn merge(&mut self, other: &ReferenceSet) {
        for reference in &other.entries {
            self.entries.insert(reference.clone());
        }
    }

    /// Whether the set contains a reference with the same identity.
    pub fn contains(&self, reference: &Reference) -> bool {
        self.entries.contains(reference)
    }

    /// Iterate the references in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &Reference> {
        self.entries.iter()
    }

    /// Number of distinct references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Reference> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = Reference>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_identity_ignores_attribute_path() {
        let plain = Reference::new("Inputs", &["inputs"]);
        let with_attr = Reference::new("Inputs", &["inputs"]).with_attributes(&["my_input"]);
        assert_eq!(plain, with_attr);
    }

    #[test]
    fn test_reference_identity_distinguishes_module() {
        let a = Reference::new("Inputs", &["inputs"]);
        let b = Reference::new("Inputs", &["nested", "inputs"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_set_deduplicates() {
        let mut set = ReferenceSet::new();
        set.insert(Reference::new("Inputs", &["inputs"]));
        set.insert(Reference::new("Inputs", &["inputs"]).with_attributes(&["other"]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_merge_is_union() {
        let mut a = ReferenceSet::single(Reference::new("A", &["m"]));
        let b = ReferenceSet::single(Reference::new("B", &["m"]));
        a.merge(&b);
        assert_eq!(a.len(), 2);
        assert!(a.contains(&Reference::new("A", &["m"])));
        assert!(a.contains(&Reference::new("B", &["m"])));
    }

    #[test]
    fn test_display() {
        let r = Reference::new("LazyReference", &["sdk", "references"]);
        assert_eq!(r.to_string(), "sdk.references.LazyReference");
    }
}
