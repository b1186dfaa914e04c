//! # Port-Call Vocabularies: Single Source of Truth
//!
//! The four closed vocabularies port-call events are expressed in. Each
//! enum serializes to the camelCase literal used on the wire, and
//! [`std::str::FromStr`] accepts exactly those literals (case-sensitive, no
//! trimming).
//!
//! | Vocabulary | Used by |
//! |------------|---------|
//! | [`PortActivity`] | first component of `eventType` |
//! | [`TimeType`] | second component of `eventType` |
//! | [`EventParty`] | third component of `eventType`, `source.party` |
//! | [`EventLocationType`] | `location.type` |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PortcallError;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $literal:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            /// Returns every member in declaration order.
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }

            /// Returns the wire literal for this member.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $literal,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PortcallError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($literal => Ok(Self::$variant),)+
                    other => Err(PortcallError::UnknownVocabulary {
                        vocabulary: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

vocabulary! {
    /// The activity or place an event is about.
    PortActivity {
        /// The port as a whole (arrival in / departure from port limits).
        Port => "port",
        /// An anchorage area outside the berth.
        AnchorArea => "anchorArea",
        /// The place where the pilot boards.
        PilotBoardingPlace => "pilotBoardingPlace",
        /// A berth alongside a quay or jetty.
        Berth => "berth",
        /// Pilotage service.
        Pilotage => "pilotage",
        /// Towage service.
        Towage => "towage",
        /// Loading and discharging.
        CargoOperations => "cargoOperations",
        /// Fuel delivery.
        Bunkering => "bunkering",
        /// Ship-generated waste collection.
        WasteCollection => "wasteCollection",
    }
}

vocabulary! {
    /// Whether a time is estimated or actual, and what it marks.
    TimeType {
        /// Estimated time of arrival.
        Eta => "eta",
        /// Actual time of arrival.
        Ata => "ata",
        /// Estimated time of departure.
        Etd => "etd",
        /// Actual time of departure.
        Atd => "atd",
        /// Estimated time a service starts.
        Ets => "ets",
        /// Actual time a service started.
        Ats => "ats",
        /// Estimated time a service completes.
        Etc => "etc",
        /// Actual time a service completed.
        Atc => "atc",
    }
}

vocabulary! {
    /// The stakeholder that asserts the event.
    EventParty {
        /// The ship itself (master or AIS-derived).
        Vessel => "vessel",
        /// The ship's agent.
        Agent => "agent",
        /// The shipping line.
        Carrier => "carrier",
        /// The terminal operator.
        Terminal => "terminal",
        /// The pilot organisation.
        Pilot => "pilot",
        /// The harbour master / port authority.
        PortAuthority => "portAuthority",
        /// The towage provider.
        TugOperator => "tugOperator",
        /// The bunker supplier.
        BunkerSupplier => "bunkerSupplier",
        /// The waste collection service.
        WasteCollector => "wasteCollector",
    }
}

vocabulary! {
    /// Kind of place an event's `location` refers to.
    EventLocationType {
        Port => "port",
        AnchorArea => "anchorArea",
        PilotBoardingPlace => "pilotBoardingPlace",
        Berth => "berth",
        Lock => "lock",
        Terminal => "terminal",
        Fairway => "fairway",
    }
}

impl TimeType {
    /// Returns true for the actual (as opposed to estimated) time types.
    pub fn is_actual(&self) -> bool {
        matches!(self, Self::Ata | Self::Atd | Self::Ats | Self::Atc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(PortActivity::all().len(), 9);
        assert_eq!(TimeType::all().len(), 8);
        assert_eq!(EventParty::all().len(), 9);
        assert_eq!(EventLocationType::all().len(), 7);
    }

    #[test]
    fn test_members_unique() {
        let mut seen = std::collections::HashSet::new();
        for party in EventParty::all() {
            assert!(seen.insert(party.as_str()), "Duplicate party: {party}");
        }
    }

    #[test]
    fn test_as_str_roundtrip() {
        for activity in PortActivity::all() {
            let parsed: PortActivity = activity.as_str().parse().unwrap();
            assert_eq!(*activity, parsed);
        }
        for time_type in TimeType::all() {
            let parsed: TimeType = time_type.as_str().parse().unwrap();
            assert_eq!(*time_type, parsed);
        }
        for location in EventLocationType::all() {
            let parsed: EventLocationType = location.as_str().parse().unwrap();
            assert_eq!(*location, parsed);
        }
    }

    #[test]
    fn test_from_str_is_exact() {
        assert!("Berth".parse::<PortActivity>().is_err());
        assert!(" berth".parse::<PortActivity>().is_err());
        assert!("portAuthority ".parse::<EventParty>().is_err());
        assert!("".parse::<TimeType>().is_err());
    }

    #[test]
    fn test_unknown_vocabulary_error_names_vocabulary() {
        let err = "bogus".parse::<EventParty>().unwrap_err();
        assert_eq!(
            err,
            PortcallError::UnknownVocabulary {
                vocabulary: "EventParty",
                value: "bogus".to_string(),
            }
        );
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for party in EventParty::all() {
            let json = serde_json::to_string(party).unwrap();
            assert_eq!(json, format!("\"{}\"", party.as_str()));
        }
    }

    #[test]
    fn test_actual_time_types() {
        let actual: Vec<_> = TimeType::all().iter().filter(|t| t.is_actual()).collect();
        assert_eq!(actual, [&TimeType::Ata, &TimeType::Atd, &TimeType::Ats, &TimeType::Atc]);
    }
}
