//! Decoding readout requests from XML request elements
//!
//! A request element carries the time window, tokens and readout types as
//! attributes, and lists nodes and fields as child elements:
//!
//! ```xml
//! <req seqnr="1" momentary="true" from="2020-01-01T00:00:00Z">
//!   <node nodeId="Meter1" cacheType="Power"/>
//!   <field name="Energy"/>
//!   <x><field var="Voltage"/></x>
//! </req>
//! ```
//!
//! Unlike the query decoder, a request element without any type attribute
//! requests no types at all. Callers relying on "nothing means everything"
//! must apply that rule themselves.

use sensor_readout_dom::Element;
use time::OffsetDateTime;

use crate::Result;
use crate::node::NodeReference;
use crate::query::parse_bool;
use crate::request::ReadoutRequest;
use crate::timestamp::{MAX_TIMESTAMP, MIN_TIMESTAMP, parse_lower_bound, parse_upper_bound};
use crate::types::{ReadoutTypeSet, TYPE_FLAGS};

/// Child elements whose `name` attribute names a requested field
pub const FIELD_ELEMENTS: [&str; 12] = [
    "field",
    "parameter",
    "boolean",
    "color",
    "date",
    "dateTime",
    "double",
    "duration",
    "int",
    "long",
    "string",
    "time",
];

/// Read access to an XML element, as handed over by an XML parser
///
/// Names are local names, compared case-sensitively.
pub trait XmlElement {
    fn local_name(&self) -> &str;

    fn attribute(&self, name: &str) -> Option<&str>;

    /// Immediate child elements in document order, skipping text and comments
    fn child_elements(&self) -> impl Iterator<Item = &Self>;
}

impl XmlElement for Element {
    fn local_name(&self) -> &str {
        self.name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        Element::attribute(self, name)
    }

    fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.elements()
    }
}

fn bool_attribute<E: XmlElement>(element: &E, name: &str, default: bool) -> bool {
    element
        .attribute(name)
        .and_then(parse_bool)
        .unwrap_or(default)
}

fn string_attribute<E: XmlElement>(element: &E, name: &str) -> String {
    element.attribute(name).unwrap_or_default().to_string()
}

fn lower_bound_attribute<E: XmlElement>(element: &E, name: &str) -> OffsetDateTime {
    element
        .attribute(name)
        .map_or(MIN_TIMESTAMP, parse_lower_bound)
}

fn upper_bound_attribute<E: XmlElement>(element: &E, name: &str) -> OffsetDateTime {
    element
        .attribute(name)
        .map_or(MAX_TIMESTAMP, parse_upper_bound)
}

/// Read the requested readout types from the attributes of a request element
///
/// `all="true"` requests every type and hides the other attributes. Otherwise
/// each type attribute set to true adds its flag; nothing is ever removed.
pub fn parse_readout_types<E: XmlElement>(element: &E) -> ReadoutTypeSet {
    if bool_attribute(element, "all", false) {
        return ReadoutTypeSet::ALL;
    }

    TYPE_FLAGS
        .iter()
        .filter(|flag| bool_attribute(element, flag.xml_attribute, false))
        .map(|flag| flag.flag)
        .collect()
}

/// Nodes and field names listed as children of a request element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodesAndFields {
    /// `None` when the element lists no node
    pub nodes: Option<Vec<NodeReference>>,
    /// `None` when the element lists no field, in document order with duplicates
    pub fields: Option<Vec<String>>,
}

/// Collect node references and field names from the children of a request element
///
/// - `node` children add a reference from their `nodeId`, `cacheType` and
///   `sourceId` attributes.
/// - Children named in [`FIELD_ELEMENTS`] add their `name` attribute.
/// - `x` children (data forms) add the `var` attribute of each `field` child,
///   one level deep.
///
/// Other children are ignored.
pub fn parse_nodes_and_fields<E: XmlElement>(element: &E) -> NodesAndFields {
    let mut result = NodesAndFields::default();

    for child in element.child_elements() {
        match child.local_name() {
            "node" => result.nodes.get_or_insert_with(Vec::new).push(NodeReference::new(
                string_attribute(child, "nodeId"),
                string_attribute(child, "cacheType"),
                string_attribute(child, "sourceId"),
            )),
            "x" => {
                for field in child.child_elements().filter(|e| e.local_name() == "field") {
                    result
                        .fields
                        .get_or_insert_with(Vec::new)
                        .push(string_attribute(field, "var"));
                }
            }
            name if FIELD_ELEMENTS.contains(&name) => result
                .fields
                .get_or_insert_with(Vec::new)
                .push(string_attribute(child, "name")),
            other => tracing::trace!("Ignoring <{}> in readout request", other),
        }
    }

    result
}

impl ReadoutRequest {
    /// Decode a request from an XML request element
    ///
    /// Malformed attributes fall back to their defaults: `false` for type
    /// flags, the open ends of the time window for `from` and `to`, and empty
    /// strings for tokens. Without any type attribute the request asks for no
    /// types.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sensor_readout::{NodeReference, ReadoutRequest, ReadoutTypeSet};
    /// use sensor_readout_dom::Element;
    ///
    /// let req = Element::new("req")
    ///     .with_attribute("all", "true")
    ///     .with_child(Element::new("node").with_attribute("nodeId", "N1"));
    ///
    /// let request = ReadoutRequest::from_xml_element(&req);
    /// assert_eq!(request.types(), ReadoutTypeSet::ALL);
    /// assert_eq!(request.nodes(), Some(&[NodeReference::with_id("N1")][..]));
    /// ```
    pub fn from_xml_element<E: XmlElement>(element: &E) -> Self {
        let NodesAndFields { nodes, fields } = parse_nodes_and_fields(element);

        let request = Self {
            types: parse_readout_types(element),
            from: lower_bound_attribute(element, "from"),
            to: upper_bound_attribute(element, "to"),
            nodes,
            fields: fields.map(|f| f.into_iter().collect()),
            service_token: string_attribute(element, "serviceToken"),
            device_token: string_attribute(element, "deviceToken"),
            user_token: string_attribute(element, "userToken"),
        };

        if request.types.is_empty() {
            tracing::debug!("XML readout request <{}> names no readout type", element.local_name());
        }
        tracing::debug!(
            "Decoded readout element: types={}, nodes={:?}, fields={:?}",
            request.types,
            request.nodes,
            request.fields
        );

        request
    }

    /// Parse XML text and decode its root element as a request
    ///
    /// # Errors
    ///
    /// Returns [`ReadoutError::Xml`](crate::ReadoutError::Xml) when the text
    /// is not a well-formed document.
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        let root = Element::parse(xml)?;
        Ok(Self::from_xml_element(&root))
    }
}
