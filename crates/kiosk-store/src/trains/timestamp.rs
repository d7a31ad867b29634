//! Departure timestamp text format.
//!
//! Departure times are local wall-clock values with no zone. They are written
//! as `2024-05-01T10:30:00` (fractional seconds only when non-zero). Reading
//! also accepts a space separator, minute precision, and RFC 3339 values with
//! an offset; for the latter the wall-clock part is kept and the offset is
//! dropped.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const READ_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Formats `value` the way it is stored.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use kiosk_store::timestamp;
///
/// let departure = NaiveDate::from_ymd_opt(2024, 5, 1)
///     .and_then(|day| day.and_hms_opt(10, 30, 0))
///     .expect("valid timestamp");
/// assert_eq!(timestamp::format(departure), "2024-05-01T10:30:00");
/// ```
#[must_use]
pub fn format(value: NaiveDateTime) -> String {
    value.format(WRITE_FORMAT).to_string()
}

/// Parses a timestamp in any accepted form.
///
/// # Errors
///
/// Returns the RFC 3339 parse error when no form matches.
pub fn parse(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let trimmed = input.trim();
    READ_FORMATS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(trimmed, pattern).ok())
        .map_or_else(
            || DateTime::parse_from_rfc3339(trimmed).map(|value| value.naive_local()),
            Ok,
        )
}

/// `serialize_with` adapter for departure times.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*value))
}

/// `deserialize_with` adapter for departure times.
///
/// # Errors
///
/// Fails when the value is not a string or matches no accepted form.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|err| {
        serde::de::Error::custom(format_args!("invalid departure time '{raw}': {err}"))
    })
}
