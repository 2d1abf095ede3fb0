//! Error types for XML tree construction

use thiserror::Error;

/// Result type alias for DOM operations
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors that can occur while turning XML text into an [`Element`](crate::Element) tree
#[derive(Error, Debug)]
pub enum DomError {
    /// The underlying tokenizer rejected the input
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// An element or attribute name was not valid UTF-8
    #[error("Invalid UTF-8 in XML name: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The document contained no element at all
    #[error("XML document has no root element")]
    MissingRoot,

    /// A second top-level element followed the root
    #[error("Unexpected element <{name}> after the root element")]
    MultipleRoots { name: String },

    /// The document ended while an element was still open
    #[error("Unclosed element <{name}>")]
    UnclosedElement { name: String },

    /// A closing tag appeared with no matching open element
    #[error("Unexpected closing tag </{name}>")]
    UnexpectedEnd { name: String },
}

impl DomError {
    /// Create a multiple roots error
    pub fn multiple_roots<S: Into<String>>(name: S) -> Self {
        Self::MultipleRoots { name: name.into() }
    }

    /// Create an unclosed element error
    pub fn unclosed<S: Into<String>>(name: S) -> Self {
        Self::UnclosedElement { name: name.into() }
    }

    /// Create an unexpected end error
    pub fn unexpected_end<S: Into<String>>(name: S) -> Self {
        Self::UnexpectedEnd { name: name.into() }
    }
}
