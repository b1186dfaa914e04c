//! Integration test: every fixture under `fixtures/events/` is a conforming
//! 3.2.1 event, and targeted mutations of those fixtures produce exactly the
//! diagnostics consumers rely on.

use portcall_core::SchemaVersion;
use portcall_schema::{
    compile_artifact, export_json_schema, EventValidator, Severity, TypeRegistry, ViolationKind,
};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn fixture_files() -> Vec<PathBuf> {
    let dir = repo_root().join("fixtures").join("events");
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", dir.display()))
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

fn load(name: &str) -> Value {
    let path = repo_root().join("fixtures").join("events").join(name);
    let text = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn validator() -> EventValidator {
    EventValidator::builtin().unwrap()
}

#[test]
fn test_all_fixtures_are_valid() {
    let files = fixture_files();
    assert!(files.len() >= 5, "expected fixture events, found {}", files.len());

    let validator = validator();
    let mut failed = Vec::new();
    for path in &files {
        let event: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let result = validator.validate(&event);
        if !result.valid || result.errors().count() > 0 {
            failed.push(format!("{}: {:?}", path.display(), result.violations));
        }
    }
    assert!(failed.is_empty(), "non-conforming fixtures:\n{}", failed.join("\n"));
}

#[test]
fn test_fixtures_are_warning_free() {
    let validator = validator();
    for path in fixture_files() {
        let event: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(validator.validate(&event).is_clean(), "{}", path.display());
    }
}

#[test]
fn test_missing_ship_identifiers() {
    let mut event = load("berth-ata-vessel.json");
    event["ship"] = json!({"name": "Nordic Star"});
    let result = validator().validate(&event);

    assert!(!result.valid);
    assert_eq!(result.violations.len(), 1);
    let v = &result.violations[0];
    assert_eq!(v.kind, ViolationKind::Presence);
    assert_eq!(v.path.to_string(), "ship");
}

#[test]
fn test_pattern_failure_is_lexical_not_type_mismatch() {
    for (field, value) in [
        ("id", json!("not-a-uuid")),
        ("port", json!("Rotterdam")),
        ("eventTime", json!("2026-03-01T08:00:00")),
        ("portcallId", json!("has spaces in it")),
    ] {
        let mut event = load("berth-ata-vessel.json");
        event[field] = value;
        let result = validator().validate(&event);
        assert!(!result.valid, "{field}");
        let at_field: Vec<_> = result
            .violations
            .iter()
            .filter(|v| v.path.to_string() == field)
            .collect();
        assert_eq!(at_field.len(), 1, "{field}: {:?}", result.violations);
        assert_eq!(at_field[0].kind, ViolationKind::Lexical);
    }
}

#[test]
fn test_uuid_violation_cites_uuid() {
    let mut event = load("port-eta-agent.json");
    event["id"] = json!("not-a-uuid");
    let result = validator().validate(&event);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule, "UUID.pattern");
    assert!(result.violations[0].message.contains("UUID"));
}

#[test]
fn test_open_polygon_fails_and_closing_it_passes() {
    let mut event = load("berth-ata-vessel.json");
    let ring = event["location"]["geo"]["coordinates"][0]
        .as_array_mut()
        .unwrap();
    let closing = ring.pop().unwrap();
    ring.push(json!([4.4290, 51.8911]));

    let result = validator().validate(&event);
    assert!(!result.valid);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].kind, ViolationKind::Semantic);
    assert_eq!(result.violations[0].path.to_string(), "location.geo.coordinates[0]");

    event["location"]["geo"]["coordinates"][0]
        .as_array_mut()
        .unwrap()
        .push(closing);
    assert!(validator().validate(&event).valid);
}

#[test]
fn test_event_type_combinations() {
    let validator = validator();
    let mut event = load("berth-ata-vessel.json");
    assert!(validator.validate(&event).valid);

    event["eventType"] = json!("berth.ata.bogus");
    let result = validator.validate(&event);
    assert!(!result.valid);
    assert_eq!(result.violations.len(), 1);
    let v = &result.violations[0];
    assert_eq!(v.kind, ViolationKind::Discriminator);
    assert_eq!(v.rule, "eventType.combination");
    assert!(v.message.contains("berth.ata.vessel"));
    assert!(v.message.contains("port.ata.agent"));
}

#[test]
fn test_padded_event_type_suggests_canonical_literal() {
    let mut event = load("berth-ata-vessel.json");
    event["eventType"] = json!("berth.ata.portAuthority ");
    let result = validator().validate(&event);
    assert!(!result.valid);
    assert_eq!(result.violations.len(), 1);
    let v = &result.violations[0];
    assert_eq!(v.kind, ViolationKind::Lexical);
    assert_eq!(v.path.to_string(), "eventType");
    assert!(v.message.contains("did you mean 'berth.ata.portAuthority'"), "{}", v.message);
}

#[test]
fn test_mooring_with_port_ata_agent_is_valid_with_warning() {
    let mut event = load("berth-ata-vessel.json");
    event["eventType"] = json!("port.ata.agent");
    event["source"] = json!({"name": "Seaport Agencies BV", "party": "agent"});
    let result = validator().validate(&event);

    assert!(result.valid, "{:?}", result.violations);
    assert_eq!(result.violations.len(), 1);
    let v = &result.violations[0];
    assert_eq!(v.kind, ViolationKind::Semantic);
    assert_eq!(v.severity, Severity::Warning);
    assert_eq!(v.path.to_string(), "context.mooring");
}

#[test]
fn test_degenerate_polygon_positions_rejected() {
    for ring in [
        json!([[4.0], [4.1], [4.2], [4.0]]),
        json!([[], [], [], []]),
    ] {
        let mut event = load("berth-ata-vessel.json");
        event["location"]["geo"]["coordinates"] = json!([ring]);
        let result = validator().validate(&event);
        assert!(!result.valid, "{ring}");
        assert_eq!(result.violations.len(), 4, "{:?}", result.violations);
        assert!(result
            .violations
            .iter()
            .all(|v| v.rule == "geometry.polygon.positionArity"));
        assert_eq!(result.violations[0].path.to_string(), "location.geo.coordinates[0][0]");
    }
}

#[test]
fn test_unknown_geometry_stops_subtree() {
    let mut event = load("port-eta-agent.json");
    event["location"]["geo"] = json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]});
    let result = validator().validate(&event);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].kind, ViolationKind::Discriminator);
    assert_eq!(result.violations[0].path.to_string(), "location.geo.type");
}

#[test]
fn test_unknown_root_field() {
    let mut event = load("port-eta-agent.json");
    event["vesselName"] = json!("Nordic Star");
    let result = validator().validate(&event);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].kind, ViolationKind::UnknownField);
}

#[test]
fn test_context_extension_is_accepted() {
    let event = load("port-atd-port-authority.json");
    assert!(event["context"].get("x-harbour-master").is_some());
    assert!(validator().validate(&event).is_clean());
}

#[test]
fn test_violations_ordered_by_depth() {
    let mut event = load("berth-ata-vessel.json");
    event["location"]["geo"]["coordinates"][0][1] = json!([4.4335, 99.0]);
    event.as_object_mut().unwrap().remove("port");
    let result = validator().validate(&event);
    let depths: Vec<usize> = result.violations.iter().map(|v| v.path.depth()).collect();
    let mut sorted = depths.clone();
    sorted.sort();
    assert_eq!(depths, sorted);
    assert_eq!(result.violations[0].path.to_string(), "port");
}

#[test]
fn test_same_depth_violations_follow_declaration_order() {
    let mut event = load("berth-ata-vessel.json");
    event["eventType"] = json!("berth.ata.bogus");
    event.as_object_mut().unwrap().remove("port");
    let result = validator().validate(&event);
    let paths: Vec<String> = result.violations.iter().map(|v| v.path.to_string()).collect();
    assert_eq!(paths, vec!["eventType", "port"]);
    assert_eq!(result.violations[0].kind, ViolationKind::Discriminator);
    assert_eq!(result.violations[1].kind, ViolationKind::Presence);
}

#[test]
fn test_validate_as_explicit_version() {
    let event = load("pilotage-ats-pilot.json");
    let result = validator().validate_as(&event, SchemaVersion::new(3, 2, 1));
    assert!(result.valid);
}

#[test]
fn test_result_serializes_for_collaborators() {
    let mut event = load("port-eta-agent.json");
    event["id"] = json!("not-a-uuid");
    let report = serde_json::to_value(validator().validate(&event)).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["violations"][0]["path"], "id");
    assert_eq!(report["violations"][0]["kind"], "LexicalViolation");
    assert_eq!(report["violations"][0]["severity"], "error");
}

#[test]
fn test_artifact_accepts_every_fixture() {
    let registry = TypeRegistry::builtin().unwrap();
    let schema = registry.get(&SchemaVersion::new(3, 2, 1)).unwrap();
    let artifact = compile_artifact(&export_json_schema(schema)).unwrap();
    for path in fixture_files() {
        let event: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(artifact.is_valid(&event), "{}", path.display());
    }
}

#[test]
fn test_concurrent_validation_shares_one_registry() {
    let validator = validator();
    let events: Vec<Value> = fixture_files()
        .iter()
        .map(|p| serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap())
        .collect();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for event in &events {
                    assert!(validator.validate(event).valid);
                }
            });
        }
        scope.spawn(|| {
            validator
                .registry()
                .publish(TypeRegistry::builtin().unwrap());
        });
    });
}
