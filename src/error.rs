//! Error types for readout request decoding

use coap_lite::ResponseType;
use thiserror::Error;

/// Result type alias for readout request operations
pub type Result<T> = std::result::Result<T, ReadoutError>;

/// Errors that can occur while decoding or encoding a readout request
///
/// Malformed filter values (timestamps, booleans, missing attributes) are not
/// errors: they fall back to documented defaults. Only an unsupported query
/// parameter rejects a request outright.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadoutError {
    /// A query parameter the transport cannot honor, such as `when`
    #[error("Unsupported readout parameter: {name}")]
    UnsupportedParameter { name: String },

    /// The XML document could not be turned into an element tree
    #[error("Invalid XML request: {message}")]
    Xml { message: String },

    /// A payload in a content format no decoder understands
    #[error("Unsupported content format: {format}")]
    UnsupportedContentFormat { format: String },

    /// Serialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Deserialization error
    #[error("Deserialization error: {message}")]
    Deserialization { message: String },
}

impl ReadoutError {
    /// Create an unsupported parameter error
    pub fn unsupported_parameter<S: Into<String>>(name: S) -> Self {
        Self::UnsupportedParameter { name: name.into() }
    }

    /// Create an XML error
    pub fn xml<S: Into<String>>(message: S) -> Self {
        Self::Xml {
            message: message.into(),
        }
    }

    /// Create an unsupported content format error
    pub fn unsupported_content_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedContentFormat {
            format: format.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a deserialization error
    pub fn deserialization<S: Into<String>>(message: S) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Whether the client caused this error and should fix its request
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedParameter { .. }
                | Self::Xml { .. }
                | Self::UnsupportedContentFormat { .. }
                | Self::Deserialization { .. }
        )
    }

    /// CoAP response code to answer a request that failed with this error
    pub fn response_type(&self) -> ResponseType {
        if let Self::UnsupportedContentFormat { .. } = self {
            ResponseType::UnsupportedContentFormat
        } else if self.is_client_error() {
            ResponseType::BadRequest
        } else {
            ResponseType::InternalServerError
        }
    }

    /// HTTP status code to answer a request that failed with this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedContentFormat { .. } => 415,
            _ if self.is_client_error() => 400,
            _ => 500,
        }
    }
}

impl From<sensor_readout_dom::DomError> for ReadoutError {
    fn from(err: sensor_readout_dom::DomError) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ReadoutError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::serialization(err.to_string())
        } else {
            Self::deserialization(err.to_string())
        }
    }
}

impl From<ciborium::de::Error<std::io::Error>> for ReadoutError {
    fn from(err: ciborium::de::Error<std::io::Error>) -> Self {
        Self::Deserialization {
            message: err.to_string(),
        }
    }
}

impl From<ciborium::ser::Error<std::io::Error>> for ReadoutError {
    fn from(err: ciborium::ser::Error<std::io::Error>) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_parameter_is_bad_request() {
        let err = ReadoutError::unsupported_parameter("when");
        assert_eq!(err.to_string(), "Unsupported readout parameter: when");
        assert_eq!(err.response_type(), ResponseType::BadRequest);
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_unsupported_content_format() {
        let err = ReadoutError::unsupported_content_format("TextPlain");
        assert!(err.is_client_error());
        assert_eq!(err.response_type(), ResponseType::UnsupportedContentFormat);
        assert_eq!(err.status_code(), 415);
    }

    #[test]
    fn test_serialization_is_server_error() {
        let err = ReadoutError::serialization("buffer full");
        assert!(!err.is_client_error());
        assert_eq!(err.response_type(), ResponseType::InternalServerError);
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_dom_error_becomes_xml_error() {
        let err: ReadoutError = sensor_readout_dom::DomError::MissingRoot.into();
        assert!(matches!(err, ReadoutError::Xml { .. }));
        assert_eq!(err.status_code(), 400);
    }
}
