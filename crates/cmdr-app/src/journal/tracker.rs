use cmdr_common::{EventKind, HostEvent, JournalEntry};
use serde_json::json;

/// Where the commander is, derived from the journal the way the game
/// client host tracks it.
#[derive(Debug, Clone, Default)]
pub struct HostTracker {
    pub commander: String,
    pub is_beta: bool,
    pub system: Option<String>,
    pub station: Option<String>,
}

impl HostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `entry` into the tracked state and wrap it for the plugin.
    pub fn observe(&mut self, entry: JournalEntry) -> HostEvent {
        self.update(&entry);
        HostEvent {
            commander: self.commander.clone(),
            is_beta: self.is_beta,
            system: self.system.clone(),
            station: self.station.clone(),
            state: json!({
                "Commander": self.commander,
                "StarSystem": self.system,
                "StationName": self.station,
            }),
            entry,
        }
    }

    /// Fold lines that predate this session into the tracked state without
    /// producing events. Malformed lines are skipped. Returns how many
    /// entries were applied.
    pub fn catch_up(&mut self, lines: &[String]) -> usize {
        let mut applied = 0;
        for entry in lines.iter().filter_map(|line| JournalEntry::parse(line).ok()) {
            self.update(&entry);
            applied += 1;
        }
        applied
    }

    fn update(&mut self, entry: &JournalEntry) {
        match &entry.kind {
            EventKind::FileHeader => {
                self.is_beta = entry
                    .game_version
                    .as_deref()
                    .is_some_and(|v| v.to_ascii_lowercase().contains("beta"));
            }
            EventKind::Commander => {
                if let Some(name) = &entry.name {
                    self.commander = name.clone();
                }
            }
            EventKind::LoadGame => {
                if let Some(name) = &entry.commander {
                    self.commander = name.clone();
                }
                self.system = None;
                self.station = None;
            }
            EventKind::Location | EventKind::CarrierJump => {
                self.set_system(entry);
                self.station = if entry.docked == Some(true) {
                    entry.station_name.clone()
                } else {
                    None
                };
            }
            EventKind::FSDJump | EventKind::SupercruiseEntry | EventKind::Undocked => {
                self.set_system(entry);
                self.station = None;
            }
            EventKind::Docked => {
                self.set_system(entry);
                self.station = entry.station_name.clone();
            }
            // StarSystem on StartJump is the destination.
            EventKind::StartJump => {}
            _ => self.set_system(entry),
        }
    }

    fn set_system(&mut self, entry: &JournalEntry) {
        if let Some(system) = &entry.star_system {
            self.system = Some(system.clone());
        }
    }
}
