//! # Lexical Rule Engine
//!
//! Pattern, format, and range checks on a single scalar. Each check is pure
//! and returns at most one [`Violation`], naming the rule and the offending
//! value.
//!
//! Shape is not checked here: a value of the wrong JSON type passes
//! silently, since the structural validator has already reported it.

use portcall_core::Timestamp;
use serde_json::Value;

use crate::registry::{Bound, Format, ScalarRule};
use crate::violation::{Path, Violation};

/// Checks `value` against the lexical constraints of `rule`.
///
/// Order: pattern, then format, then minimum, then maximum. The first
/// failure is returned.
pub fn check(value: &Value, rule: &ScalarRule, path: &Path) -> Result<(), Violation> {
    match value {
        Value::String(s) => check_str(s, rule, path),
        Value::Number(n) => match n.as_f64() {
            Some(x) => check_number(x, rule, path),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}

fn check_str(s: &str, rule: &ScalarRule, path: &Path) -> Result<(), Violation> {
    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(s) {
            return Err(Violation::lexical(
                path.clone(),
                format!("{}.pattern", rule.name),
                format!(
                    "{s:?} does not match the {} pattern {}",
                    rule.name,
                    pattern.anchored()
                ),
            ));
        }
    }
    match rule.format {
        Some(Format::DateTime) => Timestamp::parse_lenient(s).map(|_| ()).map_err(|e| {
            Violation::lexical(
                path.clone(),
                format!("{}.format", rule.name),
                format!("{s:?} is not a valid {}: {e}", Format::DateTime.as_str()),
            )
        }),
        None => Ok(()),
    }
}

fn check_number(x: f64, rule: &ScalarRule, path: &Path) -> Result<(), Violation> {
    if let Some(min) = rule.minimum {
        if below(x, min) {
            let relation = if min.exclusive { "greater than" } else { "at least" };
            return Err(Violation::lexical(
                path.clone(),
                format!("{}.minimum", rule.name),
                format!("{x} is out of range for {}: must be {relation} {}", rule.name, min.value),
            ));
        }
    }
    if let Some(max) = rule.maximum {
        if above(x, max) {
            let relation = if max.exclusive { "less than" } else { "at most" };
            return Err(Violation::lexical(
                path.clone(),
                format!("{}.maximum", rule.name),
                format!("{x} is out of range for {}: must be {relation} {}", rule.name, max.value),
            ));
        }
    }
    Ok(())
}

fn below(x: f64, bound: Bound) -> bool {
    if bound.exclusive {
        x <= bound.value
    } else {
        x < bound.value
    }
}

fn above(x: f64, bound: Bound) -> bool {
    if bound.exclusive {
        x >= bound.value
    } else {
        x > bound.value
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::registry::v3_2_1;
    use proptest::prelude::*;
    use serde_json::json;

    proptest! {
        /// Every randomly generated version-4 UUID is accepted.
        #[test]
        fn random_v4_uuid_passes(bytes in any::<[u8; 16]>()) {
            let schema = v3_2_1::schema().unwrap();
            let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
            let value = json!(uuid.hyphenated().to_string());
            prop_assert!(check(&value, schema.scalar("UUID").unwrap(), &Path::root()).is_ok());
        }

        /// Seven-digit strings are IMO numbers; any other length is not.
        #[test]
        fn imo_length_is_exact(digits in "[0-9]{1,12}") {
            let schema = v3_2_1::schema().unwrap();
            let result = check(&json!(digits), schema.scalar("ImoNumber").unwrap(), &Path::root());
            prop_assert_eq!(result.is_ok(), digits.len() == 7);
        }

        /// Latitude accepts exactly the closed interval [-90, 90].
        #[test]
        fn latitude_bounds(x in -200.0f64..200.0) {
            let schema = v3_2_1::schema().unwrap();
            let result = check(&json!(x), schema.scalar("Latitude").unwrap(), &Path::root());
            prop_assert_eq!(result.is_ok(), (-90.0..=90.0).contains(&x));
        }
    }
}
