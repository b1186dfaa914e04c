//! # Schema Versions
//!
//! Every event names the schema generation it was produced against in its
//! `version` field (`"3.2.1"` for the current generation). The registry keys
//! schema definitions by [`SchemaVersion`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PortcallError;

/// A `major.minor.patch` schema version.
///
/// Ordering is numeric per component, so `3.10.0 > 3.2.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    /// Incompatible changes.
    pub major: u32,
    /// Backward-compatible additions.
    pub minor: u32,
    /// Corrections that do not change the contract.
    pub patch: u32,
}

impl SchemaVersion {
    /// Builds a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = PortcallError;

    /// Parses `major.minor.patch`. Components are decimal digits without
    /// sign or leading zeros (`"03.2.1"` is rejected).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PortcallError::MalformedVersion(s.to_string());
        let component = |part: Option<&str>| -> Result<u32, PortcallError> {
            let part = part.ok_or_else(malformed)?;
            let digits_only = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
            if !digits_only || (part.len() > 1 && part.starts_with('0')) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };

        let mut parts = s.split('.');
        let version = Self {
            major: component(parts.next())?,
            minor: component(parts.next())?,
            patch: component(parts.next())?,
        };
        if parts.next().is_some() {
            return Err(malformed());
        }
        Ok(version)
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = PortcallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(value: SchemaVersion) -> Self {
        value.to_string()
    }
}
