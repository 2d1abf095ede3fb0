//! JSON and CBOR encodings of a readout request
//!
//! Lets a decoded request travel between gateway and readout workers without
//! going back through the query or XML form. Open ends of the time window are
//! written as `null`, absent node and field filters as `null`, so absent and
//! empty filters survive the round trip.

use std::io::Cursor;

use crate::request::ReadoutRequest;
use crate::{ReadoutError, Result};

impl ReadoutRequest {
    /// Serialize this request to a JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ReadoutError::serialization(e.to_string()))
    }

    /// Serialize this request to indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ReadoutError::serialization(e.to_string()))
    }

    /// Deserialize a request from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this request to CBOR bytes
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        ciborium::ser::into_writer(self, &mut buffer)?;
        Ok(buffer)
    }

    /// Deserialize a request from CBOR bytes
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(ciborium::de::from_reader(Cursor::new(bytes))?)
    }
}
