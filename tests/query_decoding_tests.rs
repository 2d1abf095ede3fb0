//! Query decoding tests covering HTTP query strings and CoAP `Uri-Query` options
//!
//! These tests validate the public decoding entry points end to end, from raw
//! transport input to the filters a readout engine consults.

use sensor_readout::{
    MAX_TIMESTAMP, NodeReference, ReadoutError, ReadoutRequest, ReadoutTypeSet,
    decode_coap_request, error_response, test_utils,
};

mod http_query_tests {
    use super::*;

    #[test]
    fn test_no_type_flag_means_all() {
        let request = ReadoutRequest::from_query_str("nodeId=N1&Temperature").unwrap();

        assert_eq!(request.types(), ReadoutTypeSet::ALL);
    }

    #[test]
    fn test_historical_hour_does_not_force_all() {
        let request =
            ReadoutRequest::from_query_str("historical=true&historicalhour=true").unwrap();

        assert!(request.types().contains(ReadoutTypeSet::HISTORICAL_VALUES));
        assert!(request.types().contains(ReadoutTypeSet::HISTORICAL_VALUES_HOUR));
        assert!(!request.types().is_all());
    }

    #[test]
    fn test_when_rejects_whole_request() {
        let result = ReadoutRequest::from_query_str("momentary=true&when=2020-01-01&nodeId=N1");

        match result {
            Err(ReadoutError::UnsupportedParameter { name }) => assert_eq!(name, "when"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_window_reports_no_timestamp() {
        let request = ReadoutRequest::from_query_str(
            "from=2020-02-01T00:00:00Z&to=2020-01-01T00:00:00Z",
        )
        .unwrap();

        assert!(request.from() > request.to());
        assert!(!request.should_report_timestamp(request.from()));
        assert!(!request.should_report_timestamp(request.to()));
    }

    #[test]
    fn test_bad_to_keeps_from() {
        let request = ReadoutRequest::from_query_str("from=2020-01-01&to=not-a-date").unwrap();

        assert_eq!(request.to(), MAX_TIMESTAMP);
        assert!(request.should_report_timestamp(MAX_TIMESTAMP));
        assert!(!request.should_report_timestamp(request.from() - time::Duration::SECOND));
    }

    #[test]
    fn test_node_from_query() {
        let request =
            ReadoutRequest::from_query_str("NODEID=Meter1&CacheType=Power&SourceId=Building7")
                .unwrap();

        assert_eq!(
            request.nodes(),
            Some(&[NodeReference::new("Meter1", "Power", "Building7")][..])
        );
        assert!(request.should_report_node("Meter1", "Power", "Building7"));
        assert!(!request.should_report_node("Meter1", "Water", "Building7"));
    }

    #[test]
    fn test_repeated_node_keys_keep_last_value() {
        let request = ReadoutRequest::from_query_str(
            "nodeId=Meter1&cacheType=Power&sourceId=B1&NodeId=Meter2&sourceid=B2&CACHETYPE=Water",
        )
        .unwrap();

        assert_eq!(
            request.nodes(),
            Some(&[NodeReference::new("Meter2", "Water", "B2")][..])
        );
        assert!(!request.should_report_node_id("Meter1"));
    }
}

mod coap_query_tests {
    use super::*;
    use coap_lite::{CoapOption, ResponseType};
    use sensor_readout::query::coap_query_pairs;

    #[test]
    fn test_coap_query_request() {
        let coap = test_utils::create_query_request(
            "/readout",
            &[("nodeId", "N1"), ("peak", "true"), ("Voltage", "")],
        );

        let request = decode_coap_request(&coap).unwrap();
        assert_eq!(request.types(), ReadoutTypeSet::PEAK_VALUES);
        assert!(request.should_report_node_id("N1"));
        assert!(request.should_report_field("Voltage"));
        assert!(!request.should_report_field("Current"));
    }

    #[test]
    fn test_coap_when_gets_bad_request() {
        let coap = test_utils::create_query_request("/readout", &[("when", "2020-01-01")]);

        let err = decode_coap_request(&coap).unwrap_err();
        let response = error_response(&coap, &err).expect("confirmable request gets a response");

        assert_eq!(*response.get_status(), ResponseType::BadRequest);
    }

    #[test]
    fn test_coap_xml_payload() {
        let coap = test_utils::create_xml_request(
            "/readout",
            r#"<req historicalDay="true"><node nodeId="N1"/><x><field var="Energy"/></x></req>"#,
        );

        let request = decode_coap_request(&coap).unwrap();
        assert_eq!(request.types(), ReadoutTypeSet::HISTORICAL_VALUES_DAY);
        assert_eq!(request.field_names(), Some(vec!["Energy".to_string()]));
    }

    #[test]
    fn test_invalid_utf8_options_are_decoded_lossily() {
        let mut coap = test_utils::create_query_request("/readout", &[("momentary", "true")]);
        coap.message.add_option(CoapOption::UriQuery, b"nodeId=Meter\xff1".to_vec());
        coap.message.add_option(CoapOption::UriQuery, b"Temp\xfe".to_vec());

        let pairs = coap_query_pairs(&coap);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1].0, "nodeId");
        assert_eq!(pairs[1].1, "Meter\u{FFFD}1");
        assert_eq!(pairs[2].0, "Temp\u{FFFD}");
        assert_eq!(pairs[2].1, "");

        let request = decode_coap_request(&coap).unwrap();
        assert!(request.should_report_node_id("Meter\u{FFFD}1"));
        assert!(request.should_report_field("Temp\u{FFFD}"));
        assert_eq!(request.types(), ReadoutTypeSet::MOMENTARY_VALUES);
    }
}
