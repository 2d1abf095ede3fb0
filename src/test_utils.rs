//! Test utilities for creating CoAP readout requests
//!
//! This module provides helper functions for building requests that can be
//! used across unit tests, integration tests and benches.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use coap_lite::{CoapOption, CoapRequest, ContentFormat, MessageType, Packet};

fn local_request() -> CoapRequest<SocketAddr> {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Confirmable);
    CoapRequest::from_packet(
        packet,
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 0)),
    )
}

/// Create a test GET request with one `Uri-Query` option per `key=value` pair
pub fn create_query_request(path: &str, query: &[(&str, &str)]) -> CoapRequest<SocketAddr> {
    let mut request = local_request();
    request.set_path(path);
    for (key, value) in query {
        request
            .message
            .add_option(CoapOption::UriQuery, format!("{}={}", key, value).into_bytes());
    }
    request
}

/// Create a test request carrying an XML request document
pub fn create_xml_request(path: &str, xml: &str) -> CoapRequest<SocketAddr> {
    let mut request = local_request();
    request.set_path(path);
    request.message.payload = xml.as_bytes().to_vec();
    request.message.set_content_format(ContentFormat::ApplicationXML);
    request
}
