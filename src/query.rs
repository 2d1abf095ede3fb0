//! Decoding readout requests from HTTP and CoAP queries
//!
//! A query is a flat list of `key=value` parameters. Keys are matched
//! case-insensitively against the readout vocabulary below; values keep their
//! case. Any key outside the vocabulary names a field to report.
//!
//! | Key | Effect |
//! |---|---|
//! | `nodeid`, `cachetype`, `sourceid` | Restrict the readout to one node |
//! | `all` | `true` requests every type, `false` clears the types gathered so far |
//! | `momentary`, `peak`, `status`, `computed`, `identity` | Set or clear one type |
//! | `historical`, `historical<granularity>` | Set or clear one type |
//! | `from`, `to` | Inclusive time window |
//! | `servicetoken`, `devicetoken`, `usertoken` | Opaque tokens for authorization |
//! | `when` | Rejected: point-in-time readouts need a session-based transport |
//!
//! When no type ends up set, all types are requested.

use std::borrow::Cow;

use coap_lite::{CoapOption, CoapRequest};

use crate::node::NodeReference;
use crate::request::ReadoutRequest;
use crate::timestamp::{parse_lower_bound, parse_upper_bound};
use crate::types::{ReadoutTypeSet, flag_for_query_key};
use crate::{ReadoutError, Result};

/// Parse a boolean parameter value
///
/// Accepts `true`/`false` in any case and `1`/`0`.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}

impl ReadoutRequest {
    /// Decode a request from query parameters
    ///
    /// Parameters are processed left to right; a repeated key overwrites what
    /// the earlier occurrence set. Boolean values that cannot be parsed count
    /// as false, and unparsable timestamps leave that end of the window open.
    ///
    /// # Errors
    ///
    /// Returns [`ReadoutError::UnsupportedParameter`] as soon as a `when`
    /// parameter is seen. No request is produced in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sensor_readout::{ReadoutRequest, ReadoutTypeSet};
    ///
    /// let request = ReadoutRequest::from_query([
    ///     ("nodeId", "Meter1"),
    ///     ("momentary", "true"),
    ///     ("Temperature", ""),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(request.types(), ReadoutTypeSet::MOMENTARY_VALUES);
    /// assert!(request.should_report_node_id("Meter1"));
    /// assert!(request.should_report_field("Temperature"));
    /// assert!(!request.should_report_field("Humidity"));
    /// ```
    pub fn from_query<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::new(ReadoutTypeSet::EMPTY);
        let mut node_id = String::new();
        let mut cache_type = String::new();
        let mut source_id = String::new();
        let mut all = false;

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref();
            let lower = key.to_ascii_lowercase();

            tracing::trace!("Query parameter {}={:?}", key, value);

            match lower.as_str() {
                "nodeid" => node_id = value.to_string(),
                "cachetype" => cache_type = value.to_string(),
                "sourceid" => source_id = value.to_string(),
                "all" => {
                    all = parse_bool(value).unwrap_or(false);
                    if !all {
                        request.types = ReadoutTypeSet::EMPTY;
                    }
                }
                "from" => request.from = parse_lower_bound(value),
                "to" => request.to = parse_upper_bound(value),
                "when" => {
                    tracing::warn!(
                        "Rejecting readout query: `when` is not supported over this transport"
                    );
                    return Err(ReadoutError::unsupported_parameter(key));
                }
                "servicetoken" => request.service_token = value.to_string(),
                "devicetoken" => request.device_token = value.to_string(),
                "usertoken" => request.user_token = value.to_string(),
                other => match flag_for_query_key(other) {
                    Some(flag) => request.types.set(flag, parse_bool(value).unwrap_or(false)),
                    None => {
                        request
                            .fields
                            .get_or_insert_with(Default::default)
                            .insert(key.to_string());
                    }
                },
            }
        }

        if all || request.types.is_empty() {
            request.types = ReadoutTypeSet::ALL;
        }

        if !node_id.is_empty() {
            request.nodes = Some(vec![NodeReference::new(node_id, cache_type, source_id)]);
        }

        tracing::debug!(
            "Decoded readout query: types={}, nodes={:?}, fields={:?}",
            request.types,
            request.nodes,
            request.fields
        );

        Ok(request)
    }

    /// Decode a request from a raw URL query string
    ///
    /// The string is split on `&` and percent-decoded as
    /// `application/x-www-form-urlencoded`; a leading `?` is ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sensor_readout::{ReadoutRequest, ReadoutTypeSet};
    ///
    /// let request =
    ///     ReadoutRequest::from_query_str("?historical=true&historicalHour=true").unwrap();
    /// assert_eq!(
    ///     request.types(),
    ///     ReadoutTypeSet::HISTORICAL_VALUES | ReadoutTypeSet::HISTORICAL_VALUES_HOUR
    /// );
    ///
    /// assert!(ReadoutRequest::from_query_str("when=2020-01-01").is_err());
    /// ```
    pub fn from_query_str(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_query(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Decode a request from the `Uri-Query` options of a CoAP request
    ///
    /// Every option is one `key=value` parameter. Options without `=` are
    /// keys with an empty value.
    pub fn from_coap_request<Endpoint>(request: &CoapRequest<Endpoint>) -> Result<Self> {
        Self::from_query(coap_query_pairs(request))
    }
}

/// Split the `Uri-Query` options of a CoAP request into key/value pairs
pub fn coap_query_pairs<Endpoint>(
    request: &CoapRequest<Endpoint>,
) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
    request
        .message
        .get_option(CoapOption::UriQuery)
        .map(|options| {
            options
                .iter()
                .map(|option| match option.iter().position(|b| *b == b'=') {
                    Some(eq) => (
                        String::from_utf8_lossy(&option[..eq]),
                        String::from_utf8_lossy(&option[eq + 1..]),
                    ),
                    None => (String::from_utf8_lossy(option), Cow::Borrowed("")),
                })
                .collect()
        })
        .unwrap_or_default()
}
