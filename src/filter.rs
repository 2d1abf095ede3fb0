//! Filter predicates consulted by the readout engine
//!
//! The engine asks [`ReadoutRequest::should_report_node`] before visiting a
//! node, [`ReadoutRequest::should_report_timestamp`] for every historical
//! sample and [`ReadoutRequest::should_report_field`] before emitting a value.
//! All predicates are pure and may be called concurrently once the request is
//! shared.

use time::OffsetDateTime;

use crate::request::ReadoutRequest;
use crate::types::ReadoutTypeSet;

impl ReadoutRequest {
    /// Whether a field with this name should be reported
    ///
    /// Always true without a field filter. Names are compared case-sensitively.
    pub fn should_report_field(&self, name: &str) -> bool {
        match &self.fields {
            None => true,
            Some(fields) => fields.contains(name),
        }
    }

    /// Whether a value stamped at `timestamp` lies within the requested window
    ///
    /// Both ends are inclusive. An inverted window reports nothing.
    pub fn should_report_timestamp(&self, timestamp: OffsetDateTime) -> bool {
        self.from <= timestamp && timestamp <= self.to
    }

    /// Whether a node should be read
    ///
    /// Always true without a node filter. Otherwise at least one requested
    /// reference must [match](crate::NodeReference::matches) the node.
    pub fn should_report_node(&self, node_id: &str, cache_type: &str, source_id: &str) -> bool {
        match &self.nodes {
            None => true,
            Some(nodes) => nodes
                .iter()
                .any(|reference| reference.matches(node_id, cache_type, source_id)),
        }
    }

    /// [`should_report_node`](Self::should_report_node) for a node without a cache type
    pub fn should_report_node_with_source(&self, node_id: &str, source_id: &str) -> bool {
        self.should_report_node(node_id, "", source_id)
    }

    /// [`should_report_node`](Self::should_report_node) for a bare node id
    pub fn should_report_node_id(&self, node_id: &str) -> bool {
        self.should_report_node(node_id, "", "")
    }

    /// Whether any of the given readout types was requested
    pub fn should_report_type(&self, types: ReadoutTypeSet) -> bool {
        self.types.intersects(types)
    }
}
