//! # Compound Event Types
//!
//! An `eventType` on the wire is `activity.timeType.party`, for example
//! `berth.ata.vessel`. [`EventType`] is its parsed form.
//!
//! Parsing checks each component against its vocabulary. It does **not**
//! check that the triple is a permitted combination: the three vocabularies
//! are independent, but the set of meaningful events is not their
//! cross-product (a pilot does not report cargo operations). That closed
//! table belongs to a schema generation and lives in the registry.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PortcallError;
use crate::vocabulary::{EventParty, PortActivity, TimeType};

/// Parsed `activity.timeType.party` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventType {
    /// What the event is about.
    pub activity: PortActivity,
    /// Estimated/actual and arrival/departure/start/completion.
    pub time_type: TimeType,
    /// Who asserts it.
    pub party: EventParty,
}

impl EventType {
    /// Builds an event type from its components.
    pub fn new(activity: PortActivity, time_type: TimeType, party: EventParty) -> Self {
        Self {
            activity,
            time_type,
            party,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.activity, self.time_type, self.party)
    }
}

impl FromStr for EventType {
    type Err = PortcallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let (Some(activity), Some(time_type), Some(party), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(PortcallError::MalformedEventType(s.to_string()));
        };
        Ok(Self {
            activity: activity.parse()?,
            time_type: time_type.parse()?,
            party: party.parse()?,
        })
    }
}

impl TryFrom<String> for EventType {
    type Error = PortcallError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_berth_ata_vessel() {
        let et: EventType = "berth.ata.vessel".parse().unwrap();
        assert_eq!(
            et,
            EventType::new(PortActivity::Berth, TimeType::Ata, EventParty::Vessel)
        );
        assert_eq!(et.to_string(), "berth.ata.vessel");
    }

    #[test]
    fn test_parse_unknown_party() {
        let err = "berth.ata.bogus".parse::<EventType>().unwrap_err();
        assert!(matches!(
            err,
            PortcallError::UnknownVocabulary { vocabulary: "EventParty", .. }
        ));
    }

    #[test]
    fn test_parse_wrong_arity() {
        for bad in ["berth.ata", "berth.ata.vessel.extra", "", "berth"] {
            assert_eq!(
                bad.parse::<EventType>().unwrap_err(),
                PortcallError::MalformedEventType(bad.to_string())
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let et: EventType = "pilotage.ats.pilot".parse().unwrap();
        let json = serde_json::to_string(&et).unwrap();
        assert_eq!(json, "\"pilotage.ats.pilot\"");
        let back: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, et);
        assert!(serde_json::from_str::<EventType>("\"pilotage.ats\"").is_err());
    }
}
