//! Validation Result Aggregator.
//!
//! Merges violation lists from each stage into one report: duplicates by
//! `(path, rule)` are dropped (first wins), then violations are ordered by
//! path depth and, against a schema, by declaration order. The sort is
//! stable, so stage order breaks any remaining tie.

use serde::Serialize;
use std::collections::HashSet;

use crate::registry::EventSchema;
use crate::violation::{Severity, Violation};

/// Verdict and diagnostics for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// True iff no violation has error severity.
    pub valid: bool,
    /// Ordered by path depth, then declaration order.
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Violations with error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Error)
    }

    /// Violations with warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Warning)
    }

    /// Valid and without warnings.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Merges per-stage violation lists into a [`ValidationResult`], ordered by
/// path depth only. Used when no schema could be selected.
pub fn aggregate<I>(lists: I) -> ValidationResult
where
    I: IntoIterator<Item = Vec<Violation>>,
{
    let mut violations = dedupe(lists);
    violations.sort_by_key(|v| v.path.depth());
    finish(violations)
}

/// Merges per-stage violation lists, ordering same-depth violations by where
/// `schema` declares their fields.
pub fn aggregate_in<I>(schema: &EventSchema, lists: I) -> ValidationResult
where
    I: IntoIterator<Item = Vec<Violation>>,
{
    let mut violations = dedupe(lists);
    violations.sort_by_cached_key(|v| (v.path.depth(), schema.declaration_rank(&v.path)));
    finish(violations)
}

fn dedupe<I>(lists: I) -> Vec<Violation>
where
    I: IntoIterator<Item = Vec<Violation>>,
{
    let mut seen = HashSet::new();
    lists
        .into_iter()
        .flatten()
        .filter(|v| seen.insert((v.path.clone(), v.rule.clone())))
        .collect()
}

fn finish(violations: Vec<Violation>) -> ValidationResult {
    let valid = !violations.iter().any(Violation::is_error);
    ValidationResult { valid, violations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::v3_2_1;
    use crate::violation::Path;

    #[test]
    fn test_empty_is_valid() {
        let result = aggregate(Vec::<Vec<Violation>>::new());
        assert!(result.valid);
        assert!(result.is_clean());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let at = Path::root().field("id");
        let result = aggregate([
            vec![Violation::lexical(at.clone(), "UUID.pattern", "first")],
            vec![Violation::lexical(at, "UUID.pattern", "second")],
        ]);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].message, "first");
    }

    #[test]
    fn test_same_path_different_rule_kept() {
        let at = Path::root().field("x");
        let result = aggregate([vec![
            Violation::lexical(at.clone(), "a", "m"),
            Violation::semantic(at, "b", "m"),
        ]]);
        assert_eq!(result.violations.len(), 2);
    }

    #[test]
    fn test_ordered_by_depth_then_input_order() {
        let deep = Path::root().field("location").field("geo");
        let result = aggregate([
            vec![
                Violation::lexical(deep, "deep", "m"),
                Violation::presence(Path::root().field("port"), "required", "m"),
            ],
            vec![Violation::semantic(Path::root().field("eventTime"), "late", "m")],
            vec![Violation::type_mismatch(Path::root(), "type", "m")],
        ]);
        let rules: Vec<&str> = result.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["type", "required", "late", "deep"]);
    }

    #[test]
    fn test_same_depth_follows_declaration_order() {
        let schema = v3_2_1::schema().unwrap();
        let result = aggregate_in(
            &schema,
            [
                vec![
                    Violation::presence(Path::root().field("port"), "required", "m"),
                    Violation::unknown_field(Path::root().field("vesselName"), "additionalProperties", "m"),
                ],
                vec![
                    Violation::discriminator(Path::root().field("eventType"), "eventType.combination", "m"),
                    Violation::semantic(Path::root().field("location").field("glnExtension"), "gln", "m"),
                ],
                vec![Violation::lexical(Path::root().field("location").field("type"), "enum", "m")],
            ],
        );
        let paths: Vec<String> = result.violations.iter().map(|v| v.path.to_string()).collect();
        assert_eq!(
            paths,
            vec!["eventType", "port", "vesselName", "location.type", "location.glnExtension"]
        );
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let result = aggregate([vec![Violation::semantic_warning(Path::root(), "w", "m")]]);
        assert!(result.valid);
        assert!(!result.is_clean());
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors().count(), 0);
    }
}
