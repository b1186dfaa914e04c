//! # Discriminated Union Resolver
//!
//! Selects a union variant by its discriminator field, matched exactly.
//! Variants are never tried speculatively: a missing, non-string, or unknown
//! discriminator is a single `DiscriminatorViolation` and the subtree is not
//! walked further.

use serde_json::Value;

use crate::registry::{EventSchema, ObjectRule, UnionRule};
use crate::structural::{mismatch, StructuralValidator};
use crate::violation::{json_type_name, Path, Violation};

/// Resolves the variant of `rule` that `value` selects.
pub fn resolve<'s>(
    schema: &'s EventSchema,
    value: &Value,
    rule: &UnionRule,
    path: &Path,
) -> Result<&'s ObjectRule, Violation> {
    let Some(map) = value.as_object() else {
        return Err(mismatch(path, &rule.name, "object", value));
    };

    let at = path.field(&rule.discriminator);
    let rule_id = format!("{}.discriminator", rule.name);
    let allowed = rule.tags().join(", ");

    let tag = match map.get(&rule.discriminator) {
        None | Some(Value::Null) => {
            return Err(Violation::discriminator(
                at,
                rule_id,
                format!(
                    "{} discriminator '{}' is missing; expected one of [{allowed}]",
                    rule.name, rule.discriminator
                ),
            ))
        }
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(Violation::discriminator(
                at,
                rule_id,
                format!(
                    "{} discriminator must be a string, found {}; expected one of [{allowed}]",
                    rule.name,
                    json_type_name(other)
                ),
            ))
        }
    };

    let Some(variant) = rule.select(tag) else {
        return Err(Violation::discriminator(
            at,
            rule_id,
            format!("{tag:?} is not a {} variant; expected one of [{allowed}]", rule.name),
        ));
    };

    schema.object(&variant.rule).ok_or_else(|| {
        Violation::discriminator(
            at,
            format!("{}.discriminator", rule.name),
            format!("variant {tag:?} of {} has no object definition", rule.name),
        )
    })
}

/// Resolves, then validates the selected variant structurally.
pub(crate) fn validate(
    validator: &StructuralValidator<'_>,
    value: &Value,
    rule: &UnionRule,
    path: &Path,
    out: &mut Vec<Violation>,
) {
    match resolve(validator.schema(), value, rule, path) {
        Ok(variant) => validator.walk_object(value, variant, path, out),
        Err(violation) => out.push(violation),
    }
}
