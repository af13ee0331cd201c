use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::errors::JournalError;

/// The `event` discriminator of a journal entry.
///
/// Alternate spellings the game has used over time collapse into one
/// variant. Anything unrecognised is kept verbatim in [`EventKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EventKind {
    FileHeader,
    Commander,
    LoadGame,
    Startup,
    Location,
    StartJump,
    SupercruiseEntry,
    SupercruiseExit,
    FSDJump,
    CarrierJump,
    Docked,
    Undocked,
    Shutdown,
    DockingGranted,
    DockingCancelled,
    DockingTimeout,
    Music,
    ApproachBody,
    Touchdown,
    Liftoff,
    LeaveBody,
    LaunchSRV,
    DockSRV,
    Other(String),
}

impl EventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Fileheader" | "FileHeader" => Self::FileHeader,
            "Commander" => Self::Commander,
            "LoadGame" => Self::LoadGame,
            "Startup" | "StartUp" => Self::Startup,
            "Location" => Self::Location,
            "StartJump" => Self::StartJump,
            "SupercruiseEntry" => Self::SupercruiseEntry,
            "SupercruiseExit" => Self::SupercruiseExit,
            "FSDJump" => Self::FSDJump,
            "CarrierJump" => Self::CarrierJump,
            "Docked" => Self::Docked,
            "Undocked" => Self::Undocked,
            "Shutdown" | "ShutDown" => Self::Shutdown,
            "DockingGranted" => Self::DockingGranted,
            "DockingCancelled" => Self::DockingCancelled,
            "DockingTimeout" => Self::DockingTimeout,
            "Music" => Self::Music,
            "ApproachBody" => Self::ApproachBody,
            "Touchdown" => Self::Touchdown,
            "Liftoff" => Self::Liftoff,
            "LeaveBody" => Self::LeaveBody,
            "LaunchSRV" => Self::LaunchSRV,
            "DockSRV" => Self::DockSRV,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::FileHeader => "Fileheader",
            Self::Commander => "Commander",
            Self::LoadGame => "LoadGame",
            Self::Startup => "Startup",
            Self::Location => "Location",
            Self::StartJump => "StartJump",
            Self::SupercruiseEntry => "SupercruiseEntry",
            Self::SupercruiseExit => "SupercruiseExit",
            Self::FSDJump => "FSDJump",
            Self::CarrierJump => "CarrierJump",
            Self::Docked => "Docked",
            Self::Undocked => "Undocked",
            Self::Shutdown => "Shutdown",
            Self::DockingGranted => "DockingGranted",
            Self::DockingCancelled => "DockingCancelled",
            Self::DockingTimeout => "DockingTimeout",
            Self::Music => "Music",
            Self::ApproachBody => "ApproachBody",
            Self::Touchdown => "Touchdown",
            Self::Liftoff => "Liftoff",
            Self::LeaveBody => "LeaveBody",
            Self::LaunchSRV => "LaunchSRV",
            Self::DockSRV => "DockSRV",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl Default for EventKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of the game journal, reduced to the fields presence cares about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JournalEntry {
    #[serde(rename = "event")]
    pub kind: EventKind,
    #[serde(rename = "timestamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub star_system: Option<String>,
    #[serde(default)]
    pub station_name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub start_landed: Option<bool>,
    #[serde(default)]
    pub jump_type: Option<String>,
    /// Pads are integers in the journal; older hosts deliver them as strings.
    #[serde(default, deserialize_with = "string_or_number")]
    pub landing_pad: Option<String>,
    #[serde(default)]
    pub music_track: Option<String>,
    #[serde(default)]
    pub player_controlled: Option<bool>,
    #[serde(default)]
    pub docked: Option<bool>,
    /// Commander name on `LoadGame`.
    #[serde(default)]
    pub commander: Option<String>,
    /// Commander name on `Commander`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "gameversion", default)]
    pub game_version: Option<String>,
}

impl JournalEntry {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Parse a single journal line.
    pub fn parse(line: &str) -> Result<Self, JournalError> {
        Ok(serde_json::from_str(line)?)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A journal entry as delivered by the host, together with the host's
/// tracked view of where the commander is.
#[derive(Debug, Clone, Default)]
pub struct HostEvent {
    pub commander: String,
    pub is_beta: bool,
    pub system: Option<String>,
    pub station: Option<String>,
    pub entry: JournalEntry,
    /// Host state bag. Carried for completeness, not read by translation.
    pub state: serde_json::Value,
}

impl HostEvent {
    pub fn kind(&self) -> &EventKind {
        &self.entry.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_docked_entry() {
        let line = r#"{"timestamp":"2024-03-01T18:22:04Z","event":"Docked","StationName":"Abraham Lincoln","StarSystem":"Sol","MarketID":128016640}"#;
        let entry = JournalEntry::parse(line).unwrap();
        assert_eq!(entry.kind, EventKind::Docked);
        assert_eq!(entry.station_name.as_deref(), Some("Abraham Lincoln"));
        assert_eq!(entry.star_system.as_deref(), Some("Sol"));
        assert!(entry.timestamp.is_some());
    }

    #[test]
    fn spelling_variants_collapse() {
        assert_eq!(EventKind::from_name("StartUp"), EventKind::Startup);
        assert_eq!(EventKind::from_name("Startup"), EventKind::Startup);
        assert_eq!(EventKind::from_name("ShutDown"), EventKind::Shutdown);
        assert_eq!(EventKind::from_name("Shutdown"), EventKind::Shutdown);
    }

    #[test]
    fn unknown_event_is_kept_verbatim() {
        let entry = JournalEntry::parse(r#"{"event":"ScanBaryCentre"}"#).unwrap();
        assert_eq!(entry.kind, EventKind::Other("ScanBaryCentre".into()));
        assert_eq!(entry.kind.to_string(), "ScanBaryCentre");
    }

    #[test]
    fn landing_pad_accepts_number_and_string() {
        let entry = JournalEntry::parse(r#"{"event":"DockingGranted","LandingPad":14}"#).unwrap();
        assert_eq!(entry.landing_pad.as_deref(), Some("14"));

        let entry =
            JournalEntry::parse(r#"{"event":"DockingGranted","LandingPad":"7"}"#).unwrap();
        assert_eq!(entry.landing_pad.as_deref(), Some("7"));
    }

    #[test]
    fn missing_event_field_is_an_error() {
        let err = JournalEntry::parse(r#"{"StarSystem":"Sol"}"#).unwrap_err();
        assert!(matches!(err, JournalError::Malformed(_)));
    }

    #[test]
    fn planetary_fields() {
        let entry = JournalEntry::parse(
            r#"{"event":"Liftoff","PlayerControlled":false,"Body":"Earth","StarSystem":"Sol"}"#,
        )
        .unwrap();
        assert_eq!(entry.kind, EventKind::Liftoff);
        assert_eq!(entry.player_controlled, Some(false));
        assert_eq!(entry.body.as_deref(), Some("Earth"));
    }

    #[test]
    fn host_event_exposes_kind() {
        let event = HostEvent {
            commander: "Jameson".into(),
            entry: JournalEntry::new(EventKind::Music),
            ..Default::default()
        };
        assert_eq!(event.kind(), &EventKind::Music);
    }
}
