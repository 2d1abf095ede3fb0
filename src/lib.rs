//! # Sensor Readout - requests for sensor data
//!
//! A readout request tells a sensor node which values a client wants back:
//! which categories of values, from which time window, for which nodes and
//! which fields. The same request can arrive as an HTTP query string, as CoAP
//! `Uri-Query` options, or as an XML request element from a messaging
//! protocol. This crate decodes all of them into one [`ReadoutRequest`] and
//! answers the filter questions a readout engine asks while streaming values.
//!
//! ## Quick Start
//!
//! ```rust
//! use sensor_readout::{ReadoutRequest, ReadoutTypeSet, Result};
//!
//! fn example() -> Result<()> {
//!     let request = ReadoutRequest::from_query_str(
//!         "nodeId=Meter1&historicalDay=true&from=2020-01-01T00:00:00Z&Energy",
//!     )?;
//!
//!     assert_eq!(request.types(), ReadoutTypeSet::HISTORICAL_VALUES_DAY);
//!     assert!(request.should_report_node_id("Meter1"));
//!     assert!(request.should_report_field("Energy"));
//!     assert!(!request.should_report_field("Power"));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! ## Request Model
//!
//! - **Types**: a [`ReadoutTypeSet`] of requested categories
//! - **Window**: inclusive `from`/`to` timestamps, open by default
//! - **Nodes**: optional list of [`NodeReference`]s; absent means all nodes
//! - **Fields**: optional set of field names; absent means all fields
//! - **Tokens**: service, device and user tokens, passed through untouched
//!
//! The query decoder treats a request without any type as a request for all
//! types. The XML decoder does not; see [`xml`].

pub mod coap;
pub mod codec;
pub mod error;
pub mod filter;
pub mod node;
pub mod query;
pub mod request;
pub mod timestamp;
pub mod types;
pub mod xml;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-export main types
pub use coap::{decode_coap_request, error_response};
pub use error::{ReadoutError, Result};
pub use node::NodeReference;
pub use request::{ReadoutRequest, ReadoutRequestBuilder, Resolution};
pub use timestamp::{MAX_TIMESTAMP, MIN_TIMESTAMP};
pub use types::ReadoutTypeSet;
pub use xml::{NodesAndFields, XmlElement};

pub use sensor_readout_dom as dom;
