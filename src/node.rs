//! References to nodes a readout should visit

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a node to read
///
/// A node is addressed by its id, optionally narrowed by the cache type it
/// lives in and the data source that publishes it. Empty `cache_type` or
/// `source_id` components act as wildcards when the reference is used as a
/// filter, see [`NodeReference::matches`].
///
/// Equality is structural and only meant for comparing references as values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeReference {
    node_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    cache_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    source_id: String,
}

impl NodeReference {
    pub fn new<N, C, S>(node_id: N, cache_type: C, source_id: S) -> Self
    where
        N: Into<String>,
        C: Into<String>,
        S: Into<String>,
    {
        Self {
            node_id: node_id.into(),
            cache_type: cache_type.into(),
            source_id: source_id.into(),
        }
    }

    /// A reference to a node id in any cache and any source
    pub fn with_id<N: Into<String>>(node_id: N) -> Self {
        Self::new(node_id, String::new(), String::new())
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn cache_type(&self) -> &str {
        &self.cache_type
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Whether a concrete node is selected by this reference
    ///
    /// The node id must be equal. The cache type and source id must be equal
    /// too, unless this reference leaves them empty.
    pub fn matches(&self, node_id: &str, cache_type: &str, source_id: &str) -> bool {
        self.node_id == node_id
            && (self.cache_type.is_empty() || self.cache_type == cache_type)
            && (self.source_id.is_empty() || self.source_id == source_id)
    }
}

impl fmt::Display for NodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node_id)?;
        if !self.cache_type.is_empty() {
            write!(f, "/{}", self.cache_type)?;
        }
        if !self.source_id.is_empty() {
            write!(f, "@{}", self.source_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_components_are_wildcards() {
        let reference = NodeReference::new("A", "", "");

        assert!(reference.matches("A", "", ""));
        assert!(reference.matches("A", "Meter", "Src"));
        assert!(!reference.matches("B", "", ""));
    }

    #[test]
    fn test_cache_type_must_match_when_set() {
        let reference = NodeReference::new("A", "Meter", "");

        assert!(reference.matches("A", "Meter", "anything"));
        assert!(!reference.matches("A", "", ""));
        assert!(!reference.matches("A", "meter", ""));
    }

    #[test]
    fn test_source_must_match_when_set() {
        let reference = NodeReference::new("A", "", "X");

        assert!(reference.matches("A", "Meter", "X"));
        assert!(!reference.matches("A", "", "Y"));
    }

    #[test]
    fn test_node_id_never_acts_as_wildcard() {
        let reference = NodeReference::new("", "", "");

        assert!(reference.matches("", "", ""));
        assert!(!reference.matches("A", "", ""));
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeReference::with_id("N1").to_string(), "N1");
        assert_eq!(NodeReference::new("N1", "Meter", "S").to_string(), "N1/Meter@S");
        assert_eq!(NodeReference::new("N1", "", "S").to_string(), "N1@S");
    }
}
