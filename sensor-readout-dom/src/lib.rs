//! # Sensor Readout DOM - owned XML element trees
//!
//! Sensor-data readout requests arrive over XML messaging protocols as a
//! single request element with attributes and a flat set of child elements.
//! This crate turns XML text into an owned tree of [`Element`]s that the
//! request decoder can walk, and lets tests and gateways build the same tree
//! by hand.
//!
//! ## Quick Start
//!
//! ```rust
//! use sensor_readout_dom::{Element, Result};
//!
//! fn example() -> Result<()> {
//!     let req = Element::parse(r#"<req momentary="true"><node nodeId="N1"/></req>"#)?;
//!
//!     assert_eq!(req.name(), "req");
//!     assert_eq!(req.attribute("momentary"), Some("true"));
//!     assert_eq!(req.elements().count(), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Names are stored without their namespace prefix, so `<sd:node/>` and
//! `<node/>` both report the local name `node`. Namespace declarations are
//! not kept as attributes.

pub mod element;
pub mod error;
mod parse;

pub use element::{Element, Node};
pub use error::{DomError, Result};
