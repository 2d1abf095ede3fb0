//! Owned element tree types

use std::str::FromStr;

use crate::{DomError, Result};

/// A child of an [`Element`]: either a nested element or character data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Text or CDATA content, already unescaped
    Text(String),
}

impl Node {
    /// The element behind this node, if it is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    /// The text behind this node, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Element(_) => None,
            Node::Text(t) => Some(t),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An XML element with its local name, attributes in document order, and children
///
/// # Example
///
/// ```rust
/// use sensor_readout_dom::Element;
///
/// let req = Element::new("req")
///     .with_attribute("historical", "true")
///     .with_child(Element::new("node").with_attribute("nodeId", "N1"))
///     .with_text("ignored by decoders");
///
/// assert_eq!(req.attribute("historical"), Some("true"));
/// assert_eq!(req.elements().count(), 1);
/// assert_eq!(req.children().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse XML text and return its root element
    pub fn parse(xml: &str) -> Result<Self> {
        crate::parse::parse_document(xml)
    }

    /// Add an attribute, replacing an existing one with the same name
    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append a text node
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Set an attribute in place, replacing an existing one with the same name
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();

        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append any child node in place
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Local name of this element
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute with the given local name (case-sensitive)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All child nodes, elements and text alike
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Immediate child elements, skipping text
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated immediate text content
    pub fn text(&self) -> String {
        self.children.iter().filter_map(Node::as_text).collect()
    }
}

impl FromStr for Element {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
