//! # portcall-cli: Port-Call Event Command-Line Interface
//!
//! The `portcall` binary is an external caller of `portcall-schema`: it reads
//! events, hands them to [`portcall_schema::EventValidator`], and renders the
//! results. It holds no validation logic of its own.
//!
//! ## Subcommands
//!
//! - `validate`: conformance check of one event or an array of events
//! - `schema`: JSON Schema artifact export
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers return `anyhow::Result<u8>`; the value is the process exit code.
//! - Operational failures (unreadable input, invalid JSON, bad config) are
//!   errors; non-conforming events are not.

pub mod config;
pub mod schema;
pub mod validate;
