//! Timestamp bounds and lenient parsing
//!
//! Requests carry timestamps in the XML date/time exchange format. A value
//! that cannot be parsed never fails a request: callers fall back to the
//! open end of the readout window instead.

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Earliest representable timestamp, the default lower bound of a readout window
pub const MIN_TIMESTAMP: OffsetDateTime = PrimitiveDateTime::MIN.assume_utc();

/// Latest representable timestamp, the default upper bound of a readout window
pub const MAX_TIMESTAMP: OffsetDateTime = PrimitiveDateTime::MAX.assume_utc();

/// Parse a date/time value as sent by clients
///
/// Accepts, in order: RFC 3339 (`2020-01-01T10:00:00Z`), ISO 8601 with an
/// offset, ISO 8601 date and time without offset (taken as UTC), and a bare
/// ISO 8601 date (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();

    if let Ok(t) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(t);
    }
    if let Ok(t) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        return Some(t);
    }
    if let Ok(t) = PrimitiveDateTime::parse(value, &Iso8601::DEFAULT) {
        return Some(t.assume_utc());
    }
    if let Ok(d) = Date::parse(value, &Iso8601::DEFAULT) {
        return Some(d.midnight().assume_utc());
    }

    None
}

/// Parse a lower bound, falling back to [`MIN_TIMESTAMP`]
pub fn parse_lower_bound(value: &str) -> OffsetDateTime {
    parse_timestamp(value).unwrap_or_else(|| {
        tracing::debug!("Unparsable lower bound {:?}, reading from the earliest time", value);
        MIN_TIMESTAMP
    })
}

/// Parse an upper bound, falling back to [`MAX_TIMESTAMP`]
pub fn parse_upper_bound(value: &str) -> OffsetDateTime {
    parse_timestamp(value).unwrap_or_else(|| {
        tracing::debug!("Unparsable upper bound {:?}, reading to the latest time", value);
        MAX_TIMESTAMP
    })
}

/// Serde adapters writing bounds as RFC 3339 text, with open ends as `null`
///
/// Years RFC 3339 cannot carry are written as ISO 8601 with a signed
/// six-digit year, so every value between the two sentinels can be written.
pub(crate) mod serde_bound {
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::iso8601::{Config, EncodedConfig};
    use time::format_description::well_known::{Iso8601, Rfc3339};

    const EXPANDED_YEAR: EncodedConfig = Config::DEFAULT.set_year_is_six_digits(true).encode();

    fn serialize<S: Serializer>(
        t: &OffsetDateTime,
        open_end: OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        if *t == open_end {
            return Option::<String>::None.serialize(serializer);
        }
        let text = t
            .format(&Rfc3339)
            .or_else(|_| t.format(&Iso8601::<EXPANDED_YEAR>))
            .map_err(S::Error::custom)?;
        Some(text).serialize(serializer)
    }

    fn deserialize<'de, D: Deserializer<'de>>(
        open_end: OffsetDateTime,
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(open_end),
            Some(text) => OffsetDateTime::parse(&text, &Rfc3339)
                .or_else(|_| OffsetDateTime::parse(&text, &Iso8601::DEFAULT))
                .map_err(D::Error::custom),
        }
    }

    pub(crate) mod lower {
        use super::*;
        use crate::timestamp::MIN_TIMESTAMP;

        pub(crate) fn serialize<S: Serializer>(
            t: &OffsetDateTime,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            super::serialize(t, MIN_TIMESTAMP, serializer)
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<OffsetDateTime, D::Error> {
            super::deserialize(MIN_TIMESTAMP, deserializer)
        }

        pub(crate) fn open() -> OffsetDateTime {
            MIN_TIMESTAMP
        }
    }

    pub(crate) mod upper {
        use super::*;
        use crate::timestamp::MAX_TIMESTAMP;

        pub(crate) fn serialize<S: Serializer>(
            t: &OffsetDateTime,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            super::serialize(t, MAX_TIMESTAMP, serializer)
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<OffsetDateTime, D::Error> {
            super::deserialize(MAX_TIMESTAMP, deserializer)
        }

        pub(crate) fn open() -> OffsetDateTime {
            MAX_TIMESTAMP
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_bounds_are_ordered() {
        assert!(MIN_TIMESTAMP < MAX_TIMESTAMP);
        assert!(MIN_TIMESTAMP < datetime!(0001-01-01 0:00 UTC));
        assert!(MAX_TIMESTAMP > datetime!(9999-12-31 23:59 UTC));
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_timestamp("2020-01-01T10:30:00Z"),
            Some(datetime!(2020-01-01 10:30 UTC))
        );
        assert_eq!(
            parse_timestamp("2020-01-01T10:30:00+02:00"),
            Some(datetime!(2020-01-01 8:30 UTC))
        );
    }

    #[test]
    fn test_parse_without_offset_assumes_utc() {
        assert_eq!(
            parse_timestamp("2020-01-01T10:30:00"),
            Some(datetime!(2020-01-01 10:30 UTC))
        );
    }

    #[test]
    fn test_parse_bare_date() {
        assert_eq!(
            parse_timestamp(" 2020-06-15 "),
            Some(datetime!(2020-06-15 0:00 UTC))
        );
    }

    #[test]
    fn test_garbage_falls_back_to_open_ends() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_lower_bound("yesterday"), MIN_TIMESTAMP);
        assert_eq!(parse_upper_bound(""), MAX_TIMESTAMP);
    }
}
