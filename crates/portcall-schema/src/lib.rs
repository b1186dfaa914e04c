//! # portcall-schema: Conformance Validation for Port-Call Events
//!
//! Decides whether an arbitrary JSON value is a conforming port-call event
//! and, if not, says exactly where and why.
//!
//! ## Pipeline
//!
//! ```text
//! candidate ─▶ structural (registry + lexical, unions resolved) ─▶ semantic ─▶ aggregate ─▶ verdict
//! ```
//!
//! - [`registry`]: versioned type definitions ([`TypeRegistry`]) and the
//!   hot-reload slot ([`SharedRegistry`]). Schema generation 3.2.1 ships
//!   built in.
//! - [`lexical`]: pattern, date-time and range checks on scalars.
//! - [`structural`]: presence, shape, conditional groups, unknown fields.
//! - [`union`]: discriminator-based variant selection.
//! - [`semantic`]: cross-field rules and the `eventType` combination table.
//! - [`aggregate`]: deduplicated [`ValidationResult`] ordered by depth, then
//!   declaration order.
//! - [`validate`]: [`EventValidator`], the entry point tying them together.
//! - [`export`]: JSON Schema artifact for generic toolchains.
//!
//! ## Crate Policy
//!
//! - Depends only on `portcall-core` internally.
//! - Validation never fails: every outcome is a [`ValidationResult`].
//!   [`SchemaError`] is reserved for defects in schema declarations.
//! - Candidates are borrowed and never mutated.
//! - A validation call sees exactly one registry snapshot.

pub mod aggregate;
pub mod error;
pub mod export;
pub mod lexical;
pub mod registry;
pub mod semantic;
pub mod structural;
pub mod union;
pub mod validate;
pub mod violation;

pub use aggregate::{aggregate, aggregate_in, ValidationResult};
pub use error::SchemaError;
pub use export::{compile_artifact, export_json_schema};
pub use registry::{EventSchema, SharedRegistry, TypeRegistry};
pub use validate::EventValidator;
pub use violation::{Path, Segment, Severity, Violation, ViolationKind};
