//! Rule definitions a schema generation is declared in.
//!
//! Every rule is immutable once its schema is built. Constructors here are
//! builder-style so that declarations in a version module read as a table.

use regex::Regex;
use std::collections::HashSet;

use crate::error::SchemaError;

/// Primitive JSON shape of a scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    /// A number without a fractional part; `12.0` qualifies.
    Integer,
    Boolean,
}

impl ScalarKind {
    /// JSON Schema `type` keyword for this kind.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// Named string formats checked beyond a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// ISO-8601 date-time with a mandatory zone designator.
    DateTime,
}

impl Format {
    /// JSON Schema `format` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateTime => "date-time",
        }
    }
}

/// A numeric bound. Inclusive unless marked exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    /// The bound itself is out of range.
    pub exclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// A compiled pattern that must match the whole string.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `source` anchored at both ends.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// The pattern as declared, without anchors.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The anchored form, as exported.
    pub fn anchored(&self) -> &str {
        self.anchored.as_str()
    }

    /// True if the whole of `s` matches.
    pub fn is_match(&self, s: &str) -> bool {
        self.anchored.is_match(s)
    }
}

/// A named scalar type.
#[derive(Debug, Clone)]
pub struct ScalarRule {
    pub name: String,
    pub kind: ScalarKind,
    /// Checked before `format`, then the bounds.
    pub pattern: Option<Pattern>,
    pub format: Option<Format>,
    /// Lower bound, numeric kinds only.
    pub minimum: Option<Bound>,
    /// Upper bound, numeric kinds only.
    pub maximum: Option<Bound>,
}

impl ScalarRule {
    /// A rule with no constraint beyond its JSON shape.
    pub fn new(name: &str, kind: ScalarKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            pattern: None,
            format: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, ScalarKind::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, ScalarKind::Number)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, ScalarKind::Integer)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, ScalarKind::Boolean)
    }

    /// Attaches a full-match pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] if `source` does not compile.
    pub fn with_pattern(mut self, source: &str) -> Result<Self, SchemaError> {
        let pattern = Pattern::new(source).map_err(|source| SchemaError::InvalidPattern {
            type_name: self.name.clone(),
            source,
        })?;
        self.pattern = Some(pattern);
        Ok(self)
    }

    /// Requires a named format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the lower bound.
    pub fn with_minimum(mut self, bound: Bound) -> Self {
        self.minimum = Some(bound);
        self
    }

    /// Sets the upper bound.
    pub fn with_maximum(mut self, bound: Bound) -> Self {
        self.maximum = Some(bound);
        self
    }
}

/// A field of an object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: String,
    /// Name of the field's type in the same schema.
    pub type_name: String,
    /// Absence (or `null`) is a presence violation.
    pub required: bool,
}

/// "At least `min_present` of `fields`" requirement on an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalGroup {
    /// Members, each a declared field of the same object.
    pub fields: Vec<String>,
    pub min_present: usize,
}

/// Whether an object tolerates undeclared keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownFields {
    /// Each undeclared key is an `UnknownFieldViolation`.
    Deny,
    /// Undeclared keys are accepted without inspection.
    Allow,
}

/// A named object type.
#[derive(Debug, Clone)]
pub struct ObjectRule {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldRule>,
    pub group: Option<ConditionalGroup>,
    /// Policy for keys not in `fields`.
    pub unknown_fields: UnknownFields,
}

impl ObjectRule {
    /// An object that rejects undeclared keys.
    pub fn closed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            group: None,
            unknown_fields: UnknownFields::Deny,
        }
    }

    /// An object whose undeclared keys are an extension area.
    pub fn extensible(name: &str) -> Self {
        Self {
            unknown_fields: UnknownFields::Allow,
            ..Self::closed(name)
        }
    }

    /// Declares a field that must be present.
    pub fn required(self, field: &str, type_name: &str) -> Self {
        self.with_field(field, type_name, true)
    }

    /// Declares a field that may be absent.
    pub fn optional(self, field: &str, type_name: &str) -> Self {
        self.with_field(field, type_name, false)
    }

    /// Requires at least `min_present` of the named fields to be present.
    pub fn at_least(mut self, min_present: usize, fields: &[&str]) -> Self {
        self.group = Some(ConditionalGroup {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            min_present,
        });
        self
    }

    fn with_field(mut self, field: &str, type_name: &str, required: bool) -> Self {
        self.fields.push(FieldRule {
            name: field.to_string(),
            type_name: type_name.to_string(),
            required,
        });
        self
    }

    /// The declared field called `name`.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// True if `name` is a declared field.
    pub fn declares(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// One variant of a union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Discriminator literal selecting this variant.
    pub tag: String,
    /// Name of the variant's object type.
    pub rule: String,
}

/// A discriminated union of object types.
#[derive(Debug, Clone)]
pub struct UnionRule {
    pub name: String,
    /// Field carrying the discriminator in every variant.
    pub discriminator: String,
    pub variants: Vec<Variant>,
}

impl UnionRule {
    /// A union with no variants, selected by the `discriminator` field.
    pub fn new(name: &str, discriminator: &str) -> Self {
        Self {
            name: name.to_string(),
            discriminator: discriminator.to_string(),
            variants: Vec::new(),
        }
    }

    /// Adds the variant `rule`, selected by `tag`.
    pub fn variant(mut self, tag: &str, rule: &str) -> Self {
        self.variants.push(Variant {
            tag: tag.to_string(),
            rule: rule.to_string(),
        });
        self
    }

    /// The variant selected by `tag`, matched exactly.
    pub fn select(&self, tag: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.tag == tag)
    }

    /// Discriminator literals in declaration order.
    pub fn tags(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.tag.as_str()).collect()
    }
}

/// A closed set of string literals.
#[derive(Debug, Clone)]
pub struct EnumRule {
    pub name: String,
    /// Canonical literals in declaration order.
    pub values: Vec<String>,
}

impl EnumRule {
    /// Builds the rule from raw declarations.
    ///
    /// Declarations are trimmed and deduplicated; each normalization is
    /// logged at `warn`. Wire values are later matched against the canonical
    /// literals only.
    pub fn from_declarations(name: &str, raw: &[&str]) -> Self {
        let mut seen = HashSet::new();
        let mut values = Vec::with_capacity(raw.len());
        for declared in raw {
            let literal = declared.trim();
            if literal != *declared {
                tracing::warn!(
                    type_name = name,
                    declared = *declared,
                    "trimmed whitespace from enum declaration"
                );
            }
            if !seen.insert(literal) {
                tracing::warn!(type_name = name, literal, "dropped duplicate enum declaration");
                continue;
            }
            values.push(literal.to_string());
        }
        Self {
            name: name.to_string(),
            values,
        }
    }

    /// Exact membership; no trimming or case folding.
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// The canonical literal `value` would match after trimming, if any.
    pub fn suggest(&self, value: &str) -> Option<&str> {
        let trimmed = value.trim();
        self.values
            .iter()
            .find(|v| v.as_str() == trimmed)
            .map(String::as_str)
    }
}

/// A homogeneous array.
#[derive(Debug, Clone)]
pub struct ArrayRule {
    pub name: String,
    /// Name of the item type.
    pub items: String,
}

impl ArrayRule {
    pub fn new(name: &str, items: &str) -> Self {
        Self {
            name: name.to_string(),
            items: items.to_string(),
        }
    }
}

/// Any named type in a schema.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Scalar(ScalarRule),
    Object(ObjectRule),
    Union(UnionRule),
    Enum(EnumRule),
    Array(ArrayRule),
}

impl TypeDef {
    /// The name the type is declared under.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar(r) => &r.name,
            Self::Object(r) => &r.name,
            Self::Union(r) => &r.name,
            Self::Enum(r) => &r.name,
            Self::Array(r) => &r.name,
        }
    }
}

impl From<ScalarRule> for TypeDef {
    fn from(rule: ScalarRule) -> Self {
        Self::Scalar(rule)
    }
}

impl From<ObjectRule> for TypeDef {
    fn from(rule: ObjectRule) -> Self {
        Self::Object(rule)
    }
}

impl From<UnionRule> for TypeDef {
    fn from(rule: UnionRule) -> Self {
        Self::Union(rule)
    }
}

impl From<EnumRule> for TypeDef {
    fn from(rule: EnumRule) -> Self {
        Self::Enum(rule)
    }
}

impl From<ArrayRule> for TypeDef {
    fn from(rule: ArrayRule) -> Self {
        Self::Array(rule)
    }
}
