//! # Schema Artifact Export
//!
//! Renders an [`EventSchema`] as a JSON Schema (Draft 2020-12) document for
//! producers that validate with a generic JSON Schema toolchain.
//!
//! ## Mapping
//!
//! | Rule | JSON Schema |
//! |------|-------------|
//! | scalar | `type`, anchored `pattern`, `format`, `minimum`/`exclusiveMinimum`, ... |
//! | closed object | `properties`, `required`, `additionalProperties: false` |
//! | conditional group | `anyOf` of `required` sets |
//! | union | `oneOf` of variant `$ref`s; variants pin the tag with `const` |
//! | enum | `enum`, or `const` for a single literal |
//! | `eventType` | `enum` of the combination table |
//!
//! ## Divergence
//!
//! The artifact is stricter than the runtime validator on one point and
//! looser on others. `null` on an optional field is rejected by the artifact
//! but treated as absent at runtime. Ring closure, coordinate arity and
//! bounds, and the warning-class rules are runtime-only.

use serde_json::{json, Map, Value};

use crate::error::SchemaError;
use crate::registry::{
    ArrayRule, Bound, EnumRule, EventSchema, ObjectRule, ScalarRule, TypeDef, UnionRule,
    UnknownFields, EVENT_TYPE_DEF,
};

/// Draft the artifact declares in `$schema`.
pub const JSON_SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Prefix of the artifact `$id`; the schema version is appended.
pub const ARTIFACT_ID_PREFIX: &str = "https://schemas.portcall.events/event/";

/// Renders `schema` as a JSON Schema document.
pub fn export_json_schema(schema: &EventSchema) -> Value {
    let mut defs = Map::new();
    for def in schema.types() {
        defs.insert(def.name().to_string(), export_def(def));
    }
    if let Some(Value::Object(event_type)) = defs.get_mut(EVENT_TYPE_DEF) {
        event_type.insert("enum".to_string(), json!(schema.event_types().literals()));
    }

    json!({
        "$schema": JSON_SCHEMA_DRAFT,
        "$id": format!("{ARTIFACT_ID_PREFIX}{}", schema.version()),
        "title": format!("Port-call event {}", schema.version()),
        "$ref": reference(schema.root()),
        "$defs": defs,
    })
}

/// Compiles an exported artifact.
///
/// # Errors
///
/// Returns [`SchemaError::ArtifactBuild`] if the document is not a valid
/// Draft 2020-12 schema.
pub fn compile_artifact(artifact: &Value) -> Result<jsonschema::Validator, SchemaError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.build(artifact).map_err(|e| SchemaError::ArtifactBuild {
        reason: e.to_string(),
    })
}

fn reference(name: &str) -> Value {
    json!({ "$ref": format!("#/$defs/{name}") })
}

fn export_def(def: &TypeDef) -> Value {
    match def {
        TypeDef::Scalar(rule) => export_scalar(rule),
        TypeDef::Object(rule) => export_object(rule),
        TypeDef::Union(rule) => export_union(rule),
        TypeDef::Enum(rule) => export_enum(rule),
        TypeDef::Array(rule) => export_array(rule),
    }
}

fn export_scalar(rule: &ScalarRule) -> Value {
    let mut out = Map::new();
    out.insert("type".into(), json!(rule.kind.json_type()));
    if let Some(pattern) = &rule.pattern {
        out.insert("pattern".into(), json!(pattern.anchored()));
    }
    if let Some(format) = rule.format {
        out.insert("format".into(), json!(format.as_str()));
    }
    if let Some(Bound { value, exclusive }) = rule.minimum {
        let key = if exclusive { "exclusiveMinimum" } else { "minimum" };
        out.insert(key.into(), json!(value));
    }
    if let Some(Bound { value, exclusive }) = rule.maximum {
        let key = if exclusive { "exclusiveMaximum" } else { "maximum" };
        out.insert(key.into(), json!(value));
    }
    Value::Object(out)
}

fn export_object(rule: &ObjectRule) -> Value {
    let properties: Map<String, Value> = rule
        .fields
        .iter()
        .map(|f| (f.name.clone(), reference(&f.type_name)))
        .collect();
    let required: Vec<&str> = rule
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.as_str())
        .collect();

    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".into(), json!(required));
    }
    if rule.unknown_fields == UnknownFields::Deny {
        out.insert("additionalProperties".into(), json!(false));
    }
    if let Some(group) = &rule.group {
        let alternatives: Vec<Value> = combinations(&group.fields, group.min_present)
            .into_iter()
            .map(|set| json!({ "required": set }))
            .collect();
        out.insert("anyOf".into(), json!(alternatives));
    }
    Value::Object(out)
}

fn export_union(rule: &UnionRule) -> Value {
    let variants: Vec<Value> = rule.variants.iter().map(|v| reference(&v.rule)).collect();
    json!({ "type": "object", "oneOf": variants })
}

fn export_enum(rule: &EnumRule) -> Value {
    match rule.values.as_slice() {
        [only] => json!({ "type": "string", "const": only }),
        values => json!({ "type": "string", "enum": values }),
    }
}

fn export_array(rule: &ArrayRule) -> Value {
    json!({ "type": "array", "items": reference(&rule.items) })
}

/// Every `k`-element subset of `fields`, in declaration order.
fn combinations(fields: &[String], k: usize) -> Vec<Vec<String>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for (i, head) in fields.iter().enumerate() {
        for mut tail in combinations(&fields[i + 1..], k - 1) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::v3_2_1;

    fn artifact() -> Value {
        export_json_schema(&v3_2_1::schema().unwrap())
    }

    fn event() -> Value {
        json!({
            "version": "3.2.1",
            "id": "f81d4fae-7dec-11d0-a765-00a0c91e6bf6",
            "eventType": "berth.ata.vessel",
            "eventTime": "2026-03-01T08:00:00Z",
            "recordTime": "2026-03-01T08:02:00Z",
            "source": {"name": "MV Nordic Star", "party": "vessel"},
            "ship": {"imo": "9074729", "name": "Nordic Star"},
            "port": "NLRTM",
            "location": {
                "type": "berth",
                "geo": {"type": "Point", "coordinates": [4.05, 51.95]}
            }
        })
    }

    #[test]
    fn test_artifact_header() {
        let doc = artifact();
        assert_eq!(doc["$schema"], JSON_SCHEMA_DRAFT);
        assert_eq!(doc["$id"], "https://schemas.portcall.events/event/3.2.1");
        assert_eq!(doc["$ref"], "#/$defs/Event");
    }

    #[test]
    fn test_closed_and_extensible_objects() {
        let doc = artifact();
        assert_eq!(doc["$defs"]["Event"]["additionalProperties"], false);
        assert!(doc["$defs"]["EventContext"].get("additionalProperties").is_none());
    }

    #[test]
    fn test_ship_group_is_any_of() {
        let doc = artifact();
        let any_of = doc["$defs"]["Ship"]["anyOf"].as_array().unwrap();
        assert_eq!(any_of.len(), 4);
        assert_eq!(any_of[0], json!({"required": ["imo"]}));
    }

    #[test]
    fn test_event_type_enum_is_the_table() {
        let doc = artifact();
        let values = doc["$defs"][EVENT_TYPE_DEF]["enum"].as_array().unwrap();
        assert!(values.contains(&json!("berth.ata.vessel")));
        assert!(!values.contains(&json!("berth.ata.bogus")));
        let carriers = values.iter().filter(|v| *v == "berth.ata.carrier").count();
        assert_eq!(carriers, 1);
    }

    #[test]
    fn test_patterns_are_anchored() {
        let doc = artifact();
        assert_eq!(doc["$defs"]["ImoNumber"]["pattern"], "^(?:[0-9]{7})$");
    }

    #[test]
    fn test_single_literal_enum_is_const() {
        let doc = artifact();
        assert_eq!(doc["$defs"]["PointTag"]["const"], "Point");
        assert_eq!(doc["$defs"]["SchemaVersionLiteral"]["const"], "3.2.1");
    }

    #[test]
    fn test_combinations() {
        let fields: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(combinations(&fields, 1).len(), 3);
        assert_eq!(combinations(&fields, 2), vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["a".to_string(), "c".to_string()],
            vec!["b".to_string(), "c".to_string()],
        ]);
    }

    #[test]
    fn test_artifact_compiles_and_agrees() {
        let validator = compile_artifact(&artifact()).unwrap();
        assert!(validator.is_valid(&event()));

        let mut no_ship_id = event();
        no_ship_id["ship"] = json!({"name": "Nordic Star"});
        assert!(!validator.is_valid(&no_ship_id));

        let mut bogus = event();
        bogus["eventType"] = json!("berth.ata.bogus");
        assert!(!validator.is_valid(&bogus));

        let mut unknown = event();
        unknown["flag"] = json!("NL");
        assert!(!validator.is_valid(&unknown));
    }

    #[test]
    fn test_invalid_artifact_is_reported() {
        let err = compile_artifact(&json!({"type": 12})).unwrap_err();
        assert!(matches!(err, SchemaError::ArtifactBuild { .. }));
    }
}
