//! # Structural Validator
//!
//! Walks a candidate against a type of an [`EventSchema`], collecting every
//! violation rather than stopping at the first.
//!
//! ## Rules
//!
//! - A required field that is absent or `null` is a `PresenceViolation`.
//!   `null` on an optional field is treated as absent.
//! - A present value is first checked for JSON shape (`TypeMismatchViolation`),
//!   then handed to the lexical engine. A present-but-malformed value yields
//!   only the lexical violation.
//! - An unsatisfied conditional group is one `PresenceViolation` at the object
//!   path, not one per member.
//! - Undeclared keys are `UnknownFieldViolation`s unless the object is
//!   extensible.
//! - Unions are delegated to [`crate::union`]; a bad discriminator stops that
//!   subtree.

use serde_json::{Map, Value};

use crate::lexical;
use crate::registry::{
    ArrayRule, EnumRule, EventSchema, ObjectRule, ScalarKind, ScalarRule, TypeDef, UnknownFields,
    EVENT_TYPE_DEF,
};
use crate::union;
use crate::violation::{json_type_name, Path, Violation};

/// Structural walker bound to one schema.
#[derive(Debug, Clone, Copy)]
pub struct StructuralValidator<'s> {
    schema: &'s EventSchema,
}

impl<'s> StructuralValidator<'s> {
    pub fn new(schema: &'s EventSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s EventSchema {
        self.schema
    }

    /// Validates `value` as type `type_name` located at `path`.
    pub fn validate(&self, value: &Value, type_name: &str, path: &Path) -> Vec<Violation> {
        let mut out = Vec::new();
        self.walk(value, type_name, path, &mut out);
        out
    }

    pub(crate) fn walk(&self, value: &Value, type_name: &str, path: &Path, out: &mut Vec<Violation>) {
        // References are checked when the schema is built.
        let Some(def) = self.schema.get(type_name) else {
            return;
        };
        match def {
            TypeDef::Scalar(rule) => {
                if let Some(mut violation) = scalar_violation(value, rule, path) {
                    if rule.name == EVENT_TYPE_DEF {
                        self.hint_event_type(value, &mut violation);
                    }
                    out.push(violation);
                }
            }
            TypeDef::Enum(rule) => walk_enum(value, rule, path, out),
            TypeDef::Array(rule) => self.walk_array(value, rule, path, out),
            TypeDef::Object(rule) => self.walk_object(value, rule, path, out),
            TypeDef::Union(rule) => union::validate(self, value, rule, path, out),
        }
    }

    pub(crate) fn walk_object(
        &self,
        value: &Value,
        rule: &ObjectRule,
        path: &Path,
        out: &mut Vec<Violation>,
    ) {
        let Some(map) = value.as_object() else {
            out.push(mismatch(path, &rule.name, "object", value));
            return;
        };

        for field in &rule.fields {
            let child = path.field(&field.name);
            match present(map, &field.name) {
                Some(v) => self.walk(v, &field.type_name, &child, out),
                None if field.required => out.push(Violation::presence(
                    child,
                    "required",
                    format!("required field '{}' of {} is missing", field.name, rule.name),
                )),
                None => {}
            }
        }

        if let Some(group) = &rule.group {
            let count = group
                .fields
                .iter()
                .filter(|f| present(map, f).is_some())
                .count();
            if count < group.min_present {
                out.push(Violation::presence(
                    path.clone(),
                    format!("{}.minProperties", rule.name),
                    format!(
                        "{} requires at least {} of [{}], found {count}",
                        rule.name,
                        group.min_present,
                        group.fields.join(", ")
                    ),
                ));
            }
        }

        if rule.unknown_fields == UnknownFields::Deny {
            for key in map.keys().filter(|k| !rule.declares(k)) {
                out.push(Violation::unknown_field(
                    path.field(key),
                    "additionalProperties",
                    format!("field '{key}' is not declared by {}", rule.name),
                ));
            }
        }
    }

    fn hint_event_type(&self, value: &Value, violation: &mut Violation) {
        let Some(hint) = value.as_str().and_then(|s| self.schema.event_types().suggest(s)) else {
            return;
        };
        violation.message.push_str(&format!(" (did you mean '{hint}'?)"));
    }

    fn walk_array(&self, value: &Value, rule: &ArrayRule, path: &Path, out: &mut Vec<Violation>) {
        let Some(items) = value.as_array() else {
            out.push(mismatch(path, &rule.name, "array", value));
            return;
        };
        for (i, item) in items.iter().enumerate() {
            self.walk(item, &rule.items, &path.index(i), out);
        }
    }
}

/// The value of `key`, unless absent or `null`.
fn present<'v>(map: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn scalar_violation(value: &Value, rule: &ScalarRule, path: &Path) -> Option<Violation> {
    if !matches_kind(value, rule.kind) {
        return Some(mismatch(path, &rule.name, rule.kind.json_type(), value));
    }
    lexical::check(value, rule, path).err()
}

fn walk_enum(value: &Value, rule: &EnumRule, path: &Path, out: &mut Vec<Violation>) {
    let Some(s) = value.as_str() else {
        out.push(mismatch(path, &rule.name, "string", value));
        return;
    };
    if rule.contains(s) {
        return;
    }
    let mut message = format!(
        "{s:?} is not a {} value; expected one of [{}]",
        rule.name,
        rule.values.join(", ")
    );
    if let Some(hint) = rule.suggest(s) {
        message.push_str(&format!(" (did you mean '{hint}'?)"));
    }
    out.push(Violation::lexical(path.clone(), format!("{}.enum", rule.name), message));
}

fn matches_kind(value: &Value, kind: ScalarKind) -> bool {
    match kind {
        ScalarKind::String => value.is_string(),
        ScalarKind::Number => value.is_number(),
        ScalarKind::Boolean => value.is_boolean(),
        ScalarKind::Integer => match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => true,
            Value::Number(n) => n.as_f64().is_some_and(|x| x.is_finite() && x.fract() == 0.0),
            _ => false,
        },
    }
}

pub(crate) fn mismatch(path: &Path, type_name: &str, expected: &str, found: &Value) -> Violation {
    Violation::type_mismatch(
        path.clone(),
        "type",
        format!(
            "expected {expected} for {type_name}, found {}",
            json_type_name(found)
        ),
    )
}
