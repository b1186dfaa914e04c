//! # Error Types
//!
//! Errors raised while parsing the core primitives. Validation of whole
//! events does not use these errors for control flow; the validator turns
//! parse failures into violations.

use thiserror::Error;

/// Top-level error type for `portcall-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortcallError {
    /// A literal is not a member of a closed vocabulary.
    #[error("unknown {vocabulary} {value:?}")]
    UnknownVocabulary {
        /// Name of the vocabulary (e.g. `"PortActivity"`).
        vocabulary: &'static str,
        /// The offending literal.
        value: String,
    },

    /// A compound event type does not have three dot-separated components.
    #[error("event type {0:?} must have the form activity.timeType.party")]
    MalformedEventType(String),

    /// A schema version is not `major.minor.patch`.
    #[error("schema version {0:?} must have the form major.minor.patch")]
    MalformedVersion(String),

    /// A date-time literal is not ISO-8601 with a zone designator.
    #[error("invalid date-time {value:?}: {reason}")]
    InvalidTimestamp {
        /// The offending literal.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
