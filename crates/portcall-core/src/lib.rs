//! # portcall-core: Foundational Types for Port-Call Events
//!
//! Leaf crate of the workspace. It defines the vocabularies that port-call
//! events are built from and the small set of validated primitives that the
//! schema registry and validator read.
//!
//! ## Key Design Principles
//!
//! 1. **One enum per vocabulary.** `PortActivity`, `TimeType`, `EventParty`
//!    and `EventLocationType` are closed enums with exhaustive `match`.
//!    A literal that does not parse is unknown, never "close enough".
//!
//! 2. **Compound event types are typed.** `EventType` is the parsed form of
//!    `activity.timeType.party`. Parsing only proves that each component is
//!    known; whether the triple is a *valid combination* is decided by the
//!    schema generation's closed table, not here.
//!
//! 3. **Offsets are read, `Z` is written.** [`Timestamp::parse_lenient`]
//!    accepts any well-formed zone designator; [`Timestamp::to_iso8601`]
//!    always renders UTC with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `portcall-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod event_type;
pub mod temporal;
pub mod version;
pub mod vocabulary;

// Re-export primary types for ergonomic imports.
pub use error::PortcallError;
pub use event_type::EventType;
pub use temporal::Timestamp;
pub use version::SchemaVersion;
pub use vocabulary::{EventLocationType, EventParty, PortActivity, TimeType};
