//! # Temporal Types: ISO-8601 Timestamps
//!
//! Defines `Timestamp`, the instant carried by `eventTime` and `recordTime`.
//!
//! ## Read Policy
//!
//! Producers are expected to emit UTC with a `Z` suffix, but consumers
//! accept any well-formed zone designator: `Z` or a numeric offset such as
//! `+02:00`. A date-time without a designator is rejected, as is one that
//! names an impossible calendar date.
//!
//! [`Timestamp::parse_lenient`] implements the read policy;
//! [`Timestamp::parse`] is the strict producer-side variant that requires `Z`.
//! Both normalize to UTC, so comparisons between events are offset-agnostic.

use chrono::{DateTime, Utc};

use crate::error::PortcallError;

/// A UTC instant parsed from an ISO-8601 date-time with zone designator.
///
/// Sub-second precision is preserved; it matters when ordering events that
/// the same system records within one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Wraps a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses a producer-side timestamp. Only the `Z` designator is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PortcallError::InvalidTimestamp`] if the value is malformed
    /// or carries a numeric offset (even `+00:00`).
    pub fn parse(s: &str) -> Result<Self, PortcallError> {
        if !s.ends_with('Z') {
            return Err(invalid(s, "producers must emit UTC with a Z suffix"));
        }
        Self::parse_lenient(s)
    }

    /// Parses a consumer-side timestamp, accepting any zone designator and
    /// converting to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`PortcallError::InvalidTimestamp`] if:
    /// - the date and time are not separated by an upper-case `T`,
    /// - the zone designator is missing or malformed (lower-case `z`
    ///   included),
    /// - the value is not a real calendar instant.
    pub fn parse_lenient(s: &str) -> Result<Self, PortcallError> {
        // chrono's RFC 3339 reader also takes ' ' and 't' as separators and
        // a lower-case 'z'; ISO-8601 does not.
        if s.as_bytes().get(10) != Some(&b'T') {
            return Err(invalid(s, "expected 'T' between date and time"));
        }
        if s.ends_with('z') {
            return Err(invalid(s, "zone designator must be upper-case 'Z'"));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| invalid(s, &e.to_string()))?;
        Ok(Self(dt.with_timezone(&Utc)))
    }

    /// Render as ISO-8601 UTC with `Z` suffix and seconds precision.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn invalid(value: &str, reason: &str) -> PortcallError {
    PortcallError::InvalidTimestamp {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any calendar-valid UTC instant rendered with a numeric offset is
        /// accepted and denotes the same instant as its `Z` rendering.
        #[test]
        fn offset_rendering_is_equivalent(
            secs in 0i64..4_102_444_800,
            offset_minutes in -(14i32 * 60)..=(14 * 60),
        ) {
            let utc = DateTime::from_timestamp(secs, 0).unwrap();
            let offset = chrono::FixedOffset::east_opt(offset_minutes * 60).unwrap();
            let rendered = utc.with_timezone(&offset).format("%Y-%m-%dT%H:%M:%S%:z").to_string();
            let z = utc.format("%Y-%m-%dT%H:%M:%SZ").to_string();
            let a = Timestamp::parse_lenient(&rendered).unwrap();
            let b = Timestamp::parse(&z).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
