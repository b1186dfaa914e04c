//! # Violations
//!
//! A [`Violation`] is one finding about a candidate event: where it is
//! (a [`Path`] into the candidate), which rule produced it, its taxonomy
//! [`ViolationKind`], its [`Severity`], and a human-readable message.
//!
//! Violations are plain data. They are created during validation, never
//! mutated, and returned to the caller inside a
//! [`crate::ValidationResult`].

use serde::{Serialize, Serializer};
use std::fmt;

/// Location of a value inside a candidate event.
///
/// Rendered as dotted field names with bracketed array indices, e.g.
/// `location.geo.coordinates[1]`. The root renders as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object field.
    Field(String),
    /// An array element.
    Index(usize),
}

impl Path {
    /// The path of the candidate itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extends the path with an object field.
    pub fn field(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.to_string()));
        Self { segments }
    }

    /// Extends the path with an array index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True for the candidate root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whether a violation rejects the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The event does not conform.
    Error,
    /// Informational; the event still conforms.
    Warning,
}

/// Taxonomy of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// A scalar fails a pattern, format, range, or closed-literal rule.
    #[serde(rename = "LexicalViolation")]
    Lexical,
    /// A required field is missing, or a conditional group is unsatisfied.
    #[serde(rename = "PresenceViolation")]
    Presence,
    /// A value has the wrong JSON shape for its declared type.
    #[serde(rename = "TypeMismatchViolation")]
    TypeMismatch,
    /// A discriminator is absent or names no known variant.
    #[serde(rename = "DiscriminatorViolation")]
    Discriminator,
    /// A cross-field rule is violated.
    #[serde(rename = "SemanticViolation")]
    Semantic,
    /// A field is present that its object does not declare.
    #[serde(rename = "UnknownFieldViolation")]
    UnknownField,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lexical => "LexicalViolation",
            Self::Presence => "PresenceViolation",
            Self::TypeMismatch => "TypeMismatchViolation",
            Self::Discriminator => "DiscriminatorViolation",
            Self::Semantic => "SemanticViolation",
            Self::UnknownField => "UnknownFieldViolation",
        };
        f.write_str(name)
    }
}

/// A single finding with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Where in the candidate the rule failed.
    pub path: Path,
    /// Stable rule identifier (e.g. `UUID.pattern`, `Ship.minProperties`).
    pub rule: String,
    /// Taxonomy class.
    pub kind: ViolationKind,
    /// Error or warning.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(
        path: Path,
        rule: impl Into<String>,
        kind: ViolationKind,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path,
            rule: rule.into(),
            kind,
            severity,
            message: message.into(),
        }
    }

    /// A pattern, format, range, or closed-literal failure.
    pub fn lexical(path: Path, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, rule, ViolationKind::Lexical, Severity::Error, message)
    }

    /// A missing required field or an unsatisfied conditional group.
    pub fn presence(path: Path, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, rule, ViolationKind::Presence, Severity::Error, message)
    }

    /// A value of the wrong JSON shape.
    pub fn type_mismatch(path: Path, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, rule, ViolationKind::TypeMismatch, Severity::Error, message)
    }

    /// An absent or unknown union tag, event type, or version.
    pub fn discriminator(path: Path, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, rule, ViolationKind::Discriminator, Severity::Error, message)
    }

    /// A cross-field rule that rejects the event.
    pub fn semantic(path: Path, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, rule, ViolationKind::Semantic, Severity::Error, message)
    }

    /// A semantic finding that does not reject the event.
    pub fn semantic_warning(
        path: Path,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(path, rule, ViolationKind::Semantic, Severity::Warning, message)
    }

    /// A key its object does not declare.
    pub fn unknown_field(path: Path, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(path, rule, ViolationKind::UnknownField, Severity::Error, message)
    }

    /// True if this violation rejects the event.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.path.is_root() {
            write!(f, "  {level} (root) [{}]: {}", self.rule, self.message)
        } else {
            write!(f, "  {level} {} [{}]: {}", self.path, self.rule, self.message)
        }
    }
}

/// JSON type name of a value, for messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
