//! # Cross-Field Semantic Validator
//!
//! Rules that span several fields or depend on the parsed `eventType`.
//! These run after the structural walk and only look at values whose shape
//! is already right: a field that is missing or mistyped is skipped here,
//! since it has been reported once already.
//!
//! | Rule | Kind | Severity |
//! |------|------|----------|
//! | `eventType.combination` | Discriminator | error |
//! | `context.mooring.activity` | Semantic | warning |
//! | `context.clearance.party` | Semantic | warning |
//! | `location.glnExtension.requiresGln` | Semantic | error |
//! | `geometry.point.arity` | Semantic | error |
//! | `geometry.polygon.rings` / `.ringSize` / `.closed` / `.positionArity` | Semantic | error |
//! | `Longitude.*` / `Latitude.*` | Lexical | error |
//! | `eventTime.actualAfterRecord` | Semantic | warning |

use portcall_core::{EventParty, EventType, PortActivity, PortcallError, Timestamp};
use serde_json::{Map, Value};

use crate::lexical;
use crate::registry::{EventSchema, EVENT_TYPE_DEF};
use crate::violation::{Path, Violation};

/// Runs every cross-field rule over `event`, located at `path`.
pub fn check(event: &Value, schema: &EventSchema, path: &Path) -> Vec<Violation> {
    let mut out = Vec::new();
    let Some(map) = event.as_object() else {
        return out;
    };

    let event_type = check_event_type(map, schema, path, &mut out);
    if let Some(event_type) = event_type {
        check_context(map, event_type, path, &mut out);
        check_times(map, event_type, path, &mut out);
    }
    check_location(map, schema, path, &mut out);
    out
}

/// Returns the event type only if it is a permitted combination.
fn check_event_type(
    map: &Map<String, Value>,
    schema: &EventSchema,
    path: &Path,
    out: &mut Vec<Violation>,
) -> Option<EventType> {
    let literal = map.get("eventType")?.as_str()?;
    let at = path.field("eventType");

    // A literal of the wrong shape already carries a lexical violation.
    if let Some(rule) = schema.scalar(EVENT_TYPE_DEF) {
        lexical::check(&Value::String(literal.to_string()), rule, &at).ok()?;
    }

    let table = schema.event_types();
    let reason = match literal.parse::<EventType>() {
        Ok(event_type) if table.contains(&event_type) => return Some(event_type),
        Ok(_) => "is not a permitted combination".to_string(),
        Err(PortcallError::UnknownVocabulary { vocabulary, value }) => {
            format!("has unknown {vocabulary} {value:?}")
        }
        Err(e) => e.to_string(),
    };
    out.push(Violation::discriminator(
        at,
        "eventType.combination",
        format!(
            "{literal:?} {reason}; valid combinations are [{}]",
            table.literals().join(", ")
        ),
    ));
    None
}

fn check_context(
    map: &Map<String, Value>,
    event_type: EventType,
    path: &Path,
    out: &mut Vec<Violation>,
) {
    let Some(context) = map.get("context").and_then(Value::as_object) else {
        return;
    };
    let at = path.field("context");

    if is_present(context, "mooring") && event_type.activity != PortActivity::Berth {
        out.push(Violation::semantic_warning(
            at.field("mooring"),
            "context.mooring.activity",
            format!(
                "mooring details are only meaningful for berth events, not {}",
                event_type.activity
            ),
        ));
    }
    if is_present(context, "clearance") && event_type.party != EventParty::PortAuthority {
        out.push(Violation::semantic_warning(
            at.field("clearance"),
            "context.clearance.party",
            format!(
                "clearance is granted by the port authority, but the event is asserted by {}",
                event_type.party
            ),
        ));
    }
}

fn check_times(
    map: &Map<String, Value>,
    event_type: EventType,
    path: &Path,
    out: &mut Vec<Violation>,
) {
    if !event_type.time_type.is_actual() {
        return;
    }
    let instant = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .and_then(|s| Timestamp::parse_lenient(s).ok())
    };
    let (Some(event_time), Some(record_time)) = (instant("eventTime"), instant("recordTime")) else {
        return;
    };
    if event_time > record_time {
        out.push(Violation::semantic_warning(
            path.field("eventTime"),
            "eventTime.actualAfterRecord",
            format!(
                "actual {} at {event_time} is later than its recordTime {record_time}",
                event_type.time_type
            ),
        ));
    }
}

fn check_location(
    map: &Map<String, Value>,
    schema: &EventSchema,
    path: &Path,
    out: &mut Vec<Violation>,
) {
    let Some(location) = map.get("location").and_then(Value::as_object) else {
        return;
    };
    let at = path.field("location");

    if is_present(location, "glnExtension") && !is_present(location, "gln") {
        out.push(Violation::semantic(
            at.field("glnExtension"),
            "location.glnExtension.requiresGln",
            "glnExtension is only meaningful together with gln",
        ));
    }

    let Some(geo) = location.get("geo").and_then(Value::as_object) else {
        return;
    };
    let Some(coordinates) = geo.get("coordinates").and_then(Value::as_array) else {
        return;
    };
    let at = at.field("geo").field("coordinates");
    match geo.get("type").and_then(Value::as_str) {
        Some("Point") => check_point(coordinates, schema, &at, out),
        Some("Polygon") => check_polygon(coordinates, schema, &at, out),
        _ => {}
    }
}

fn check_point(position: &[Value], schema: &EventSchema, path: &Path, out: &mut Vec<Violation>) {
    check_position(position, schema, path, "geometry.point.arity", out);
}

fn check_polygon(rings: &[Value], schema: &EventSchema, path: &Path, out: &mut Vec<Violation>) {
    if rings.is_empty() {
        out.push(Violation::semantic(
            path.clone(),
            "geometry.polygon.rings",
            "a Polygon has at least one linear ring",
        ));
        return;
    }
    for (i, ring) in rings.iter().enumerate() {
        let Some(ring) = ring.as_array() else {
            continue;
        };
        let at = path.index(i);
        if ring.len() < 4 {
            out.push(Violation::semantic(
                at.clone(),
                "geometry.polygon.ringSize",
                format!("a linear ring has at least 4 positions, found {}", ring.len()),
            ));
        } else if !same_position(&ring[0], &ring[ring.len() - 1]) {
            out.push(Violation::semantic(
                at.clone(),
                "geometry.polygon.closed",
                "a linear ring must end at its first position",
            ));
        }
        for (j, position) in ring.iter().enumerate() {
            if let Some(position) = position.as_array() {
                check_position(position, schema, &at.index(j), "geometry.polygon.positionArity", out);
            }
        }
    }
}

/// Exactly longitude and latitude, each within bounds.
fn check_position(
    position: &[Value],
    schema: &EventSchema,
    path: &Path,
    rule: &str,
    out: &mut Vec<Violation>,
) {
    if position.len() != 2 {
        out.push(Violation::semantic(
            path.clone(),
            rule,
            format!(
                "a position has exactly 2 coordinates (longitude, latitude), found {}",
                position.len()
            ),
        ));
        return;
    }
    check_bounds(position, schema, path, out);
}

/// Longitude then latitude, checked by the lexical engine.
fn check_bounds(position: &[Value], schema: &EventSchema, path: &Path, out: &mut Vec<Violation>) {
    for (i, name) in ["Longitude", "Latitude"].into_iter().enumerate() {
        let (Some(value), Some(rule)) = (position.get(i), schema.scalar(name)) else {
            continue;
        };
        if let Err(v) = lexical::check(value, rule, &path.index(i)) {
            out.push(v);
        }
    }
}

/// Numeric equality of two positions; `1` and `1.0` are the same coordinate.
fn same_position(a: &Value, b: &Value) -> bool {
    let coords = |v: &Value| -> Option<Vec<f64>> {
        v.as_array()?.iter().map(Value::as_f64).collect()
    };
    match (coords(a), coords(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

fn is_present(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}
