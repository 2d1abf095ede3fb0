//! CoAP transport glue
//!
//! A CoAP readout request either carries its parameters as `Uri-Query`
//! options, or a full request document as payload. [`decode_coap_request`]
//! picks the decoder from the declared content format.

use coap_lite::{CoapRequest, CoapResponse, ContentFormat};

use crate::request::ReadoutRequest;
use crate::{ReadoutError, Result};

/// Decode a readout request from a CoAP request
///
/// | Content format | Decoder |
/// |---|---|
/// | none, or empty payload | `Uri-Query` options |
/// | `application/xml` | XML request element |
/// | `application/json` | JSON encoding of the request |
/// | `application/cbor` | CBOR encoding of the request |
///
/// Any other content format is rejected with
/// [`ReadoutError::UnsupportedContentFormat`].
pub fn decode_coap_request<Endpoint>(request: &CoapRequest<Endpoint>) -> Result<ReadoutRequest> {
    let payload = &request.message.payload;
    if payload.is_empty() {
        return ReadoutRequest::from_coap_request(request);
    }

    match request.message.get_content_format() {
        None => ReadoutRequest::from_coap_request(request),
        Some(ContentFormat::ApplicationXML) => {
            let xml = std::str::from_utf8(payload).map_err(|e| ReadoutError::xml(e.to_string()))?;
            ReadoutRequest::from_xml_str(xml)
        }
        Some(ContentFormat::ApplicationJSON) => {
            let json = std::str::from_utf8(payload)
                .map_err(|e| ReadoutError::deserialization(e.to_string()))?;
            ReadoutRequest::from_json(json)
        }
        Some(ContentFormat::ApplicationCBOR) => ReadoutRequest::from_cbor(payload),
        Some(other) => {
            tracing::info!("Unsupported readout request content format: {:?}", other);
            Err(ReadoutError::unsupported_content_format(format!("{:?}", other)))
        }
    }
}

/// Build the response for a request that could not be decoded
///
/// The status follows [`ReadoutError::response_type`]; the payload carries
/// the error message as plain text. Returns `None` when the request message
/// cannot be answered (acknowledgements and resets).
pub fn error_response<Endpoint>(
    request: &CoapRequest<Endpoint>,
    err: &ReadoutError,
) -> Option<CoapResponse> {
    let mut response = CoapResponse::new(&request.message)?;
    response.set_status(err.response_type());
    response.message.set_content_format(ContentFormat::TextPlain);
    response.message.payload = err.to_string().into_bytes();
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeReference, ReadoutTypeSet};
    use coap_lite::{CoapOption, MessageType, ResponseType};

    fn with_payload(payload: &[u8], format: ContentFormat) -> CoapRequest<()> {
        let mut request = CoapRequest::new();
        request.message.payload = payload.to_vec();
        request.message.set_content_format(format);
        request
    }

    #[test]
    fn test_query_options_without_payload() {
        let mut request = CoapRequest::<()>::new();
        request
            .message
            .add_option(CoapOption::UriQuery, b"status=true".to_vec());

        let decoded = decode_coap_request(&request).unwrap();
        assert_eq!(decoded.types(), ReadoutTypeSet::STATUS_VALUES);
    }

    #[test]
    fn test_xml_payload() {
        let request = with_payload(
            br#"<req momentary="true"><node nodeId="N1" sourceId="S"/></req>"#,
            ContentFormat::ApplicationXML,
        );

        let decoded = decode_coap_request(&request).unwrap();
        assert_eq!(decoded.types(), ReadoutTypeSet::MOMENTARY_VALUES);
        assert_eq!(decoded.nodes(), Some(&[NodeReference::new("N1", "", "S")][..]));
    }

    #[test]
    fn test_json_and_cbor_payloads() {
        let original = ReadoutRequest::builder()
            .types(ReadoutTypeSet::IDENTITY)
            .field("serial")
            .build();

        let json = with_payload(
            original.to_json().unwrap().as_bytes(),
            ContentFormat::ApplicationJSON,
        );
        assert_eq!(decode_coap_request(&json).unwrap(), original);

        let cbor = with_payload(&original.to_cbor().unwrap(), ContentFormat::ApplicationCBOR);
        assert_eq!(decode_coap_request(&cbor).unwrap(), original);
    }

    #[test]
    fn test_unsupported_format() {
        let request = with_payload(b"hello", ContentFormat::TextPlain);

        let err = decode_coap_request(&request).unwrap_err();
        assert_eq!(err.response_type(), ResponseType::UnsupportedContentFormat);
    }

    #[test]
    fn test_error_response_for_when() {
        let mut request = CoapRequest::<()>::new();
        request.message.header.set_type(MessageType::Confirmable);
        request
            .message
            .add_option(CoapOption::UriQuery, b"when=2020-01-01".to_vec());

        let err = decode_coap_request(&request).unwrap_err();
        let response = error_response(&request, &err).unwrap();

        assert_eq!(*response.get_status(), ResponseType::BadRequest);
        assert_eq!(response.message.payload, b"Unsupported readout parameter: when".to_vec());
    }
}
