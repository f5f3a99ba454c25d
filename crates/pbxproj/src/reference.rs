//! Object references
//!
//! Every node of a project graph is stored under an opaque string identifier.
//! Edges between nodes are references, never pointers, so the graph can hold
//! forward references and cycles.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Opaque identifier naming a node in the project graph.
///
/// Ordering is lexical, which is the order Xcode uses inside each section.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reference(String);

impl Reference {
    /// Create a reference from any string-like value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the reference and return the identifier
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Reference {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for Reference {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Reference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&Reference> for Reference {
    fn from(value: &Reference) -> Self {
        value.clone()
    }
}

impl PartialEq<str> for Reference {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Reference {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_references_sort_lexically() {
        let mut refs = vec![
            Reference::from("OBJ_9"),
            Reference::from("OBJ_10"),
            Reference::from("A1"),
        ];
        refs.sort();
        assert_eq!(refs, vec!["A1", "OBJ_10", "OBJ_9"]);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(Reference::from("FR_1"), 1);
        assert_eq!(map.get("FR_1"), Some(&1));
    }

    #[test]
    fn test_nodes_with_reference_fields_have_defaults() {
        assert_eq!(Reference::default().as_str(), "");
        let proxy = crate::objects::ContainerItemProxy::default();
        assert!(proxy.container_portal.as_str().is_empty());
        let project = crate::objects::Project::default();
        assert!(project.main_group.as_str().is_empty());
    }
}
