//! # Validation Pipeline
//!
//! [`EventValidator`] runs candidate → structural (with lexical and union
//! resolution) → semantic → aggregate against one registry snapshot.
//!
//! ## Schema Selection
//!
//! [`EventValidator::validate`] reads the candidate's own `version`. A
//! missing, malformed, or unregistered version is reported and traversal
//! stops there: without a schema there is nothing to walk.
//! [`EventValidator::validate_as`] takes the version from the caller; the
//! embedded `version` is then checked like any other field.

use portcall_core::SchemaVersion;
use serde_json::Value;

use crate::aggregate::{aggregate, aggregate_in, ValidationResult};
use crate::error::SchemaError;
use crate::registry::{SharedRegistry, TypeRegistry};
use crate::semantic;
use crate::structural::{mismatch, StructuralValidator};
use crate::violation::{json_type_name, Path, Violation};

/// Validates candidate events against a shared registry.
#[derive(Debug, Clone)]
pub struct EventValidator {
    registry: SharedRegistry,
}

impl EventValidator {
    /// A validator reading schemas from `registry`.
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// A validator over the built-in schema generations.
    pub fn builtin() -> Result<Self, SchemaError> {
        Ok(Self::new(SharedRegistry::new(TypeRegistry::builtin()?)))
    }

    /// Handle to the registry, for publishing a new rule set.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Validates `candidate` against the schema its `version` field names.
    pub fn validate(&self, candidate: &Value) -> ValidationResult {
        let registry = self.registry.snapshot();
        match select_version(candidate, &registry) {
            Ok(version) => run(&registry, candidate, version),
            Err(violation) => {
                let result = aggregate([vec![violation]]);
                tracing::debug!(valid = result.valid, "rejected event before schema selection");
                result
            }
        }
    }

    /// Validates `candidate` against the schema for `version`.
    pub fn validate_as(&self, candidate: &Value, version: SchemaVersion) -> ValidationResult {
        let registry = self.registry.snapshot();
        run(&registry, candidate, version)
    }
}

fn select_version(candidate: &Value, registry: &TypeRegistry) -> Result<SchemaVersion, Violation> {
    let root = Path::root();
    let Some(map) = candidate.as_object() else {
        return Err(mismatch(&root, "Event", "object", candidate));
    };
    let at = root.field("version");
    let literal = match map.get("version") {
        None | Some(Value::Null) => {
            return Err(Violation::presence(
                at,
                "required",
                "required field 'version' is missing; cannot select a schema",
            ))
        }
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(Violation::type_mismatch(
                at,
                "type",
                format!("expected string for version, found {}", json_type_name(other)),
            ))
        }
    };
    let version: SchemaVersion = literal.parse().map_err(|_| {
        Violation::lexical(
            at.clone(),
            "SchemaVersion.pattern",
            format!("{literal:?} is not a major.minor.patch version"),
        )
    })?;
    if registry.get(&version).is_none() {
        return Err(unknown_version(at, version, registry));
    }
    Ok(version)
}

fn unknown_version(at: Path, version: SchemaVersion, registry: &TypeRegistry) -> Violation {
    let known: Vec<String> = registry.versions().iter().map(ToString::to_string).collect();
    Violation::discriminator(
        at,
        "version.unknown",
        format!(
            "no schema is registered for version {version}; known versions are [{}]",
            known.join(", ")
        ),
    )
}

fn run(registry: &TypeRegistry, candidate: &Value, version: SchemaVersion) -> ValidationResult {
    let root = Path::root();
    let Some(schema) = registry.get(&version) else {
        return aggregate([vec![unknown_version(root.field("version"), version, registry)]]);
    };
    if !candidate.is_object() {
        return aggregate([vec![mismatch(&root, schema.root(), "object", candidate)]]);
    }

    let structural = StructuralValidator::new(schema).validate(candidate, schema.root(), &root);
    let semantic = semantic::check(candidate, schema, &root);
    let result = aggregate_in(schema, [structural, semantic]);

    tracing::debug!(
        %version,
        valid = result.valid,
        errors = result.errors().count(),
        warnings = result.warnings().count(),
        "validated event"
    );
    result
}
