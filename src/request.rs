//! The readout request model

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::node::NodeReference;
use crate::timestamp::{MAX_TIMESTAMP, MIN_TIMESTAMP};
use crate::types::ReadoutTypeSet;

/// A request for sensor data
///
/// Describes which categories of values a client wants, from which time
/// window, for which nodes and which fields. Absent `nodes` or `fields` mean
/// "everything"; they are never collapsed into an empty collection, which
/// would mean "nothing".
///
/// The request is immutable once built. A trusted execution step may rewrite
/// the requested types, nodes and fields exactly once through
/// [`ReadoutRequest::into_resolution`] before the request is shared with
/// readout workers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadoutRequest {
    #[serde(default)]
    pub(crate) types: ReadoutTypeSet,

    #[serde(
        with = "crate::timestamp::serde_bound::lower",
        default = "crate::timestamp::serde_bound::lower::open"
    )]
    pub(crate) from: OffsetDateTime,

    #[serde(
        with = "crate::timestamp::serde_bound::upper",
        default = "crate::timestamp::serde_bound::upper::open"
    )]
    pub(crate) to: OffsetDateTime,

    #[serde(default)]
    pub(crate) nodes: Option<Vec<NodeReference>>,

    #[serde(default)]
    pub(crate) fields: Option<BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) service_token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) device_token: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) user_token: String,
}

impl Default for ReadoutRequest {
    fn default() -> Self {
        Self::new(ReadoutTypeSet::ALL)
    }
}

impl ReadoutRequest {
    /// Request the given types over the whole time range, for all nodes and fields
    pub fn new(types: ReadoutTypeSet) -> Self {
        Self {
            types,
            from: MIN_TIMESTAMP,
            to: MAX_TIMESTAMP,
            nodes: None,
            fields: None,
            service_token: String::new(),
            device_token: String::new(),
            user_token: String::new(),
        }
    }

    /// Request the given types between two timestamps, both inclusive
    ///
    /// An inverted range is accepted and simply matches no timestamp.
    pub fn with_range(types: ReadoutTypeSet, from: OffsetDateTime, to: OffsetDateTime) -> Self {
        Self {
            from,
            to,
            ..Self::new(types)
        }
    }

    /// Request the given types and time range for an explicit set of nodes
    ///
    /// `None` requests all nodes.
    pub fn with_nodes(
        types: ReadoutTypeSet,
        from: OffsetDateTime,
        to: OffsetDateTime,
        nodes: Option<Vec<NodeReference>>,
    ) -> Self {
        Self {
            nodes,
            ..Self::with_range(types, from, to)
        }
    }

    /// Request the given types, time range and nodes, limited to named fields
    ///
    /// Duplicate field names collapse into one.
    pub fn with_fields<I, S>(
        types: ReadoutTypeSet,
        from: OffsetDateTime,
        to: OffsetDateTime,
        nodes: Option<Vec<NodeReference>>,
        fields: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            ..Self::with_nodes(types, from, to, nodes)
        }
    }

    /// The complete form, also carrying the caller's service, device and user tokens
    ///
    /// Tokens are passed through verbatim for an authorization step to inspect.
    #[allow(clippy::too_many_arguments)]
    pub fn with_tokens<I, S>(
        types: ReadoutTypeSet,
        from: OffsetDateTime,
        to: OffsetDateTime,
        nodes: Option<Vec<NodeReference>>,
        fields: I,
        service_token: impl Into<String>,
        device_token: impl Into<String>,
        user_token: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service_token: service_token.into(),
            device_token: device_token.into(),
            user_token: user_token.into(),
            ..Self::with_fields(types, from, to, nodes, fields)
        }
    }

    /// Start building a request with the fluent API
    pub fn builder() -> ReadoutRequestBuilder {
        ReadoutRequestBuilder::new()
    }

    /// Readout types requested
    pub fn types(&self) -> ReadoutTypeSet {
        self.types
    }

    /// Earliest timestamp requested
    pub fn from(&self) -> OffsetDateTime {
        self.from
    }

    /// Latest timestamp requested
    pub fn to(&self) -> OffsetDateTime {
        self.to
    }

    /// Nodes explicitly requested, or `None` when all nodes are implied
    pub fn nodes(&self) -> Option<&[NodeReference]> {
        self.nodes.as_deref()
    }

    /// Fields explicitly requested, or `None` when all fields are implied
    pub fn fields(&self) -> Option<&BTreeSet<String>> {
        self.fields.as_ref()
    }

    /// Requested field names in sorted order, or `None` when all fields are implied
    pub fn field_names(&self) -> Option<Vec<String>> {
        self.fields
            .as_ref()
            .map(|fields| fields.iter().cloned().collect())
    }

    pub fn service_token(&self) -> &str {
        &self.service_token
    }

    pub fn device_token(&self) -> &str {
        &self.device_token
    }

    pub fn user_token(&self) -> &str {
        &self.user_token
    }

    /// Hand the request to the trusted resolution step
    ///
    /// Consuming the request guarantees the rewrite happens before anyone
    /// else can observe it.
    pub fn into_resolution(self) -> Resolution {
        Resolution { request: self }
    }
}

/// Exclusive, one-time access to the rewritable parts of a request
///
/// Used by the execution engine to replace an implicit "all nodes" request
/// by the concrete nodes it will visit, or to narrow the requested types,
/// before fanning the request out to workers.
///
/// # Example
///
/// ```rust
/// use sensor_readout::{NodeReference, ReadoutRequest, ReadoutTypeSet};
///
/// let request = ReadoutRequest::new(ReadoutTypeSet::MOMENTARY_VALUES);
///
/// let shared = request
///     .into_resolution()
///     .set_nodes(Some(vec![NodeReference::with_id("Meter1")]))
///     .publish();
///
/// assert!(shared.should_report_node_id("Meter1"));
/// assert!(!shared.should_report_node_id("Meter2"));
/// ```
#[derive(Debug)]
pub struct Resolution {
    request: ReadoutRequest,
}

impl Resolution {
    /// The request as it currently stands
    pub fn request(&self) -> &ReadoutRequest {
        &self.request
    }

    pub fn set_types(mut self, types: ReadoutTypeSet) -> Self {
        self.request.types = types;
        self
    }

    /// Replace the node filter; `None` requests all nodes
    pub fn set_nodes(mut self, nodes: Option<Vec<NodeReference>>) -> Self {
        self.request.nodes = nodes;
        self
    }

    /// Replace the field filter; `None` requests all fields
    pub fn set_fields<I, S>(mut self, fields: Option<I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request.fields = fields.map(|f| f.into_iter().map(Into::into).collect());
        self
    }

    /// End the resolution and take the request back
    pub fn finish(self) -> ReadoutRequest {
        self.request
    }

    /// End the resolution and share the request with readers
    pub fn publish(self) -> Arc<ReadoutRequest> {
        Arc::new(self.request)
    }
}

/// Builder for readout requests with a fluent API
///
/// Starts from the defaults: all types, the whole time range, no node or
/// field filter and empty tokens. Adding a single node or field turns the
/// corresponding filter on.
#[derive(Debug, Default)]
pub struct ReadoutRequestBuilder {
    request: ReadoutRequest,
}

impl ReadoutRequestBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(mut self, types: ReadoutTypeSet) -> Self {
        self.request.types = types;
        self
    }

    pub fn from(mut self, from: OffsetDateTime) -> Self {
        self.request.from = from;
        self
    }

    pub fn to(mut self, to: OffsetDateTime) -> Self {
        self.request.to = to;
        self
    }

    /// Add one node to the node filter
    pub fn node(mut self, node: NodeReference) -> Self {
        self.request.nodes.get_or_insert_with(Vec::new).push(node);
        self
    }

    /// Add several nodes to the node filter
    pub fn nodes<I: IntoIterator<Item = NodeReference>>(mut self, nodes: I) -> Self {
        self.request
            .nodes
            .get_or_insert_with(Vec::new)
            .extend(nodes);
        self
    }

    /// Add one field name to the field filter
    pub fn field<S: Into<String>>(mut self, name: S) -> Self {
        self.request
            .fields
            .get_or_insert_with(BTreeSet::new)
            .insert(name.into());
        self
    }

    /// Add several field names to the field filter
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request
            .fields
            .get_or_insert_with(BTreeSet::new)
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn service_token<S: Into<String>>(mut self, token: S) -> Self {
        self.request.service_token = token.into();
        self
    }

    pub fn device_token<S: Into<String>>(mut self, token: S) -> Self {
        self.request.device_token = token.into();
        self
    }

    pub fn user_token<S: Into<String>>(mut self, token: S) -> Self {
        self.request.user_token = token.into();
        self
    }

    /// Build the request
    pub fn build(self) -> ReadoutRequest {
        self.request
    }
}
