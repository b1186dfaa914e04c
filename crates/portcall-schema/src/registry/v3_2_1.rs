//! Schema generation 3.2.1.
//!
//! Declarations are kept as published, including the duplicated
//! `berth.ata.carrier` row and the `"portAuthority "` literal. The builder
//! normalizes both and logs what it changed.

use portcall_core::{EventLocationType, EventParty, SchemaVersion};
use std::str::FromStr;

use super::{
    ArrayRule, Bound, EnumRule, EventSchema, Format, ObjectRule, ScalarRule, UnionRule,
    EVENT_TYPE_DEF,
};
use crate::error::SchemaError;

pub const VERSION: SchemaVersion = SchemaVersion::new(3, 2, 1);

const UUID: &str = "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}";
const EVENT_TYPE: &str = r"[A-Za-z]+\.[A-Za-z]+\.[A-Za-z]+";
const UN_LOCODE: &str = "[A-Z]{2}[A-Z2-9]{3}";
const PORTCALL_ID: &str = "[A-Za-z0-9._:-]{1,128}";
const IMO: &str = "[0-9]{7}";
const ENI: &str = "[0-9]{8}";
const MMSI: &str = "[0-9]{9}";
const USCG: &str = "[A-Z0-9]{1,7}";
const GLN: &str = "[0-9]{13}";
// GS1 AI 254 character set 82.
const GLN_EXTENSION: &str = r#"[!"%-/0-9:-?A-Z_a-z]{1,20}"#;
const NON_EMPTY: &str = r".*\S.*";

const EVENT_PARTIES: &[&str] = &[
    "vessel",
    "agent",
    "carrier",
    "terminal",
    "pilot",
    "portAuthority ",
    "tugOperator",
    "bunkerSupplier",
    "wasteCollector",
];

const LOCATION_TYPES: &[&str] = &[
    "port",
    "anchorArea",
    "pilotBoardingPlace",
    "berth",
    "lock",
    "terminal",
    "fairway",
];

const EVENT_TYPES: &[&str] = &[
    "port.eta.agent",
    "port.eta.carrier",
    "port.eta.vessel",
    "port.eta.portAuthority",
    "port.ata.agent",
    "port.ata.vessel",
    "port.ata.portAuthority",
    "port.etd.agent",
    "port.etd.carrier",
    "port.etd.portAuthority",
    "port.atd.agent",
    "port.atd.vessel",
    "port.atd.portAuthority",
    "anchorArea.eta.agent",
    "anchorArea.ata.vessel",
    "anchorArea.ata.portAuthority",
    "anchorArea.etd.agent",
    "anchorArea.atd.vessel",
    "pilotBoardingPlace.eta.pilot",
    "pilotBoardingPlace.eta.agent",
    "pilotBoardingPlace.ata.pilot",
    "pilotBoardingPlace.ata.vessel",
    "berth.eta.agent",
    "berth.eta.carrier",
    "berth.eta.terminal",
    "berth.eta.portAuthority",
    "berth.ata.vessel",
    "berth.ata.agent",
    "berth.ata.carrier",
    "berth.ata.carrier",
    "berth.ata.terminal",
    "berth.ata.portAuthority",
    "berth.etd.agent",
    "berth.etd.carrier",
    "berth.etd.terminal",
    "berth.atd.vessel",
    "berth.atd.agent",
    "berth.atd.carrier",
    "berth.atd.terminal",
    "berth.atd.portAuthority",
    "pilotage.ets.pilot",
    "pilotage.ets.portAuthority",
    "pilotage.ats.pilot",
    "pilotage.etc.pilot",
    "pilotage.atc.pilot",
    "towage.ets.tugOperator",
    "towage.ets.agent",
    "towage.ats.tugOperator",
    "towage.atc.tugOperator",
    "cargoOperations.ets.terminal",
    "cargoOperations.ats.terminal",
    "cargoOperations.etc.terminal",
    "cargoOperations.atc.terminal",
    "bunkering.ets.bunkerSupplier",
    "bunkering.ets.agent",
    "bunkering.ats.bunkerSupplier",
    "bunkering.atc.bunkerSupplier",
    "wasteCollection.ets.wasteCollector",
    "wasteCollection.atc.wasteCollector",
];

/// Builds the 3.2.1 schema.
pub fn schema() -> Result<EventSchema, SchemaError> {
    let mut b = EventSchema::builder(VERSION, "Event");

    // Scalars.
    b.define(ScalarRule::string("UUID").with_pattern(UUID)?)?;
    b.define(ScalarRule::string("DateTime").with_format(Format::DateTime))?;
    b.define(ScalarRule::string(EVENT_TYPE_DEF).with_pattern(EVENT_TYPE)?)?;
    b.define(ScalarRule::string("UNLocode").with_pattern(UN_LOCODE)?)?;
    b.define(ScalarRule::string("PortcallId").with_pattern(PORTCALL_ID)?)?;
    b.define(ScalarRule::string("ImoNumber").with_pattern(IMO)?)?;
    b.define(ScalarRule::string("EniNumber").with_pattern(ENI)?)?;
    b.define(ScalarRule::string("Mmsi").with_pattern(MMSI)?)?;
    b.define(ScalarRule::string("UscgNumber").with_pattern(USCG)?)?;
    b.define(ScalarRule::string("Gln").with_pattern(GLN)?)?;
    b.define(ScalarRule::string("GlnExtension").with_pattern(GLN_EXTENSION)?)?;
    b.define(ScalarRule::string("NonEmptyText").with_pattern(NON_EMPTY)?)?;
    b.define(ScalarRule::string("Text"))?;
    b.define(ScalarRule::boolean("Flag"))?;
    b.define(ScalarRule::integer("BollardNumber").with_minimum(Bound::inclusive(0.0)))?;
    b.define(ScalarRule::number("Coordinate"))?;
    b.define(
        ScalarRule::number("Longitude")
            .with_minimum(Bound::inclusive(-180.0))
            .with_maximum(Bound::inclusive(180.0)),
    )?;
    b.define(
        ScalarRule::number("Latitude")
            .with_minimum(Bound::inclusive(-90.0))
            .with_maximum(Bound::inclusive(90.0)),
    )?;

    // Closed literal sets.
    b.define(EnumRule::from_declarations("SchemaVersionLiteral", &["3.2.1"]))?;
    let parties = EnumRule::from_declarations("EventParty", EVENT_PARTIES);
    ensure_vocabulary::<EventParty>(&parties)?;
    b.define(parties)?;
    let location_types = EnumRule::from_declarations("EventLocationType", LOCATION_TYPES);
    ensure_vocabulary::<EventLocationType>(&location_types)?;
    b.define(location_types)?;
    b.define(EnumRule::from_declarations("PointTag", &["Point"]))?;
    b.define(EnumRule::from_declarations("PolygonTag", &["Polygon"]))?;

    // Geometry.
    b.define(ArrayRule::new("Position", "Coordinate"))?;
    b.define(ArrayRule::new("LinearRing", "Position"))?;
    b.define(ArrayRule::new("PolygonRings", "LinearRing"))?;
    b.define(
        ObjectRule::closed("GeometryPoint")
            .required("type", "PointTag")
            .required("coordinates", "Position"),
    )?;
    b.define(
        ObjectRule::closed("GeometryPolygon")
            .required("type", "PolygonTag")
            .required("coordinates", "PolygonRings"),
    )?;
    b.define(
        UnionRule::new("Geometry", "type")
            .variant("Point", "GeometryPoint")
            .variant("Polygon", "GeometryPolygon"),
    )?;

    // Objects.
    b.define(
        ObjectRule::closed("Source")
            .required("name", "NonEmptyText")
            .optional("party", "EventParty"),
    )?;
    b.define(
        ObjectRule::closed("Ship")
            .optional("imo", "ImoNumber")
            .optional("eni", "EniNumber")
            .optional("mmsi", "Mmsi")
            .optional("uscg", "UscgNumber")
            .optional("name", "NonEmptyText")
            .at_least(1, &["imo", "eni", "mmsi", "uscg"]),
    )?;
    b.define(
        ObjectRule::closed("EventLocation")
            .required("type", "EventLocationType")
            .optional("name", "NonEmptyText")
            .optional("geo", "Geometry")
            .optional("gln", "Gln")
            .optional("glnExtension", "GlnExtension"),
    )?;
    b.define(
        ObjectRule::closed("Mooring")
            .optional("portsideTo", "Flag")
            .optional("bollardFore", "BollardNumber")
            .optional("bollardAft", "BollardNumber"),
    )?;
    b.define(
        ObjectRule::closed("Clearance")
            .required("granted", "Flag")
            .optional("reference", "Text"),
    )?;
    b.define(
        ObjectRule::extensible("EventContext")
            .optional("mooring", "Mooring")
            .optional("clearance", "Clearance")
            .optional("remarks", "Text"),
    )?;
    b.define(
        ObjectRule::closed("Event")
            .required("version", "SchemaVersionLiteral")
            .required("id", "UUID")
            .required("eventType", EVENT_TYPE_DEF)
            .required("eventTime", "DateTime")
            .required("recordTime", "DateTime")
            .required("source", "Source")
            .required("ship", "Ship")
            .required("port", "UNLocode")
            .optional("portcallId", "PortcallId")
            .optional("location", "EventLocation")
            .optional("context", "EventContext"),
    )?;

    b.event_types(EVENT_TYPES)?;
    b.build()
}

/// Every canonical literal of `rule` must name a member of vocabulary `T`.
fn ensure_vocabulary<T>(rule: &EnumRule) -> Result<(), SchemaError>
where
    T: FromStr<Err = portcall_core::PortcallError>,
{
    for literal in &rule.values {
        T::from_str(literal)?;
    }
    Ok(())
}
