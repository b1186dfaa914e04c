//! Errors raised while building a type registry or exporting its artifact.
//!
//! Validation outcomes are not errors: a non-conforming event produces a
//! [`crate::ValidationResult`] with violations. `SchemaError` only reports
//! defects in the *schema declarations* themselves, which are caught once at
//! registry construction.

use portcall_core::{PortcallError, SchemaVersion};
use thiserror::Error;

/// Error while declaring, registering, or exporting a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A scalar pattern is not a valid regular expression.
    #[error("invalid pattern for type '{type_name}': {source}")]
    InvalidPattern {
        /// Type that declared the pattern.
        type_name: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Two types with the same name were declared in one schema.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    /// Two schemas with the same version were registered.
    #[error("schema version {0} is already registered")]
    DuplicateVersion(SchemaVersion),

    /// A type references a name that is not declared.
    #[error("type '{referenced_by}' references undeclared type '{name}'")]
    UnresolvedType {
        /// Type holding the dangling reference.
        referenced_by: String,
        /// The missing type name.
        name: String,
    },

    /// Two variants of one union share a discriminator value.
    #[error("union '{union}' declares discriminator value '{tag}' more than once")]
    DuplicateDiscriminator {
        /// The union.
        union: String,
        /// The repeated discriminator value.
        tag: String,
    },

    /// A declaration is structurally inconsistent.
    #[error("invalid declaration of '{type_name}': {reason}")]
    InvalidDeclaration {
        /// The offending type.
        type_name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A vocabulary literal in the declarations does not parse.
    #[error("vocabulary error: {0}")]
    Vocabulary(#[from] PortcallError),

    /// No schema is registered for the requested version.
    #[error("no schema registered for version {0}")]
    UnknownVersion(SchemaVersion),

    /// The exported JSON Schema artifact could not be compiled.
    #[error("artifact build error: {reason}")]
    ArtifactBuild {
        /// Reason reported by the JSON Schema compiler.
        reason: String,
    },
}
