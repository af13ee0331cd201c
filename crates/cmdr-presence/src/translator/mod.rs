//! Journal event to presence translation.
//!
//! [`Translator::translate`] is pure: it reads the current record and one
//! event and returns what the record should become. The supervisor decides
//! what to do with the result.

use std::sync::Arc;

use cmdr_common::{EventKind, HostEvent};

use crate::localize::{render, English, Localizer, Phrase};
use crate::record::{PresenceRecord, SmallIcon};

/// What the main-menu music shows as the state line.
///
/// Older hosts showed the connecting placeholder; newer ones say "In menus".
/// Resolved once when the translator is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPresence {
    Connecting,
    #[default]
    InMenus,
}

/// Carried fields after an event, plus whether the anchor moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideEffects {
    pub reset_anchor: bool,
    pub current_system: Option<String>,
    pub current_planet: String,
    pub landing_pad: String,
    pub shutdown: bool,
}

impl SideEffects {
    /// No-op effects: everything as `record` has it.
    pub fn carried_from(record: &PresenceRecord) -> Self {
        Self {
            reset_anchor: false,
            current_system: record.current_system.clone(),
            current_planet: record.current_planet.clone(),
            landing_pad: record.landing_pad.clone(),
            shutdown: record.shutdown,
        }
    }
}

/// Result of translating one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub state: String,
    pub details: String,
    pub small_image: SmallIcon,
    pub small_text: String,
    pub large_text: String,
    pub effects: SideEffects,
}

pub struct Translator {
    localizer: Arc<dyn Localizer>,
    menu: MenuPresence,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Arc::new(English), MenuPresence::default())
    }
}

impl Translator {
    pub fn new(localizer: Arc<dyn Localizer>, menu: MenuPresence) -> Self {
        Self { localizer, menu }
    }

    pub fn phrase(&self, phrase: Phrase<'_>) -> String {
        render(self.localizer.as_ref(), phrase)
    }

    /// State line shown before the first event of a session.
    pub fn placeholder(&self) -> String {
        self.phrase(Phrase::ConnectingInterface)
    }

    pub fn translate(&self, record: &PresenceRecord, event: &HostEvent) -> Translation {
        let entry = &event.entry;
        let system = event.system.as_deref().unwrap_or_default();

        let mut out = Translation {
            state: record.state.clone(),
            details: record.details.clone(),
            small_image: record.small_image,
            small_text: record.small_text.clone(),
            large_text: self.phrase(Phrase::Commander(&event.commander)),
            effects: SideEffects {
                shutdown: false,
                ..SideEffects::carried_from(record)
            },
        };

        if event.system != record.current_system {
            out.effects.reset_anchor = true;
            out.effects.current_system = event.system.clone();
        }

        // First match wins. Undocked appears twice; the earlier arm claims it.
        match &entry.kind {
            EventKind::LoadGame | EventKind::Startup | EventKind::Location => {
                out.state = self.phrase(Phrase::InSystem(system));
                match event.station.as_deref() {
                    None => {
                        out.details = self.phrase(Phrase::FlyingNormalSpace);
                        out.small_image = SmallIcon::System;
                        out.small_text = system.to_string();
                    }
                    Some(station) => {
                        out.details = self.phrase(Phrase::DockedAt(station));
                        out.small_image = SmallIcon::Station;
                        out.small_text = station.to_string();
                    }
                }
                if entry.start_landed == Some(true) {
                    if let Some(body) = non_empty(entry.body.as_deref()) {
                        out.effects.current_planet = body.to_string();
                        out.details = self.phrase(Phrase::LandedOn(body));
                        out.small_image = SmallIcon::Planet;
                        out.small_text = body.to_string();
                    }
                }
                out.effects.reset_anchor = true;
            }
            EventKind::StartJump => {
                out.state = self.phrase(Phrase::Jumping);
                match entry.jump_type.as_deref() {
                    Some("Hyperspace") => {
                        let dest = entry.star_system.as_deref().unwrap_or_default();
                        out.details = self.phrase(Phrase::JumpingTo(dest));
                    }
                    Some("Supercruise") => {
                        out.details = self.phrase(Phrase::PreparingSupercruise);
                    }
                    _ => {}
                }
            }
            EventKind::SupercruiseEntry => {
                out.state = self.phrase(Phrase::InSystem(system));
                out.details = self.phrase(Phrase::Supercruising);
                out.small_image = SmallIcon::System;
                out.small_text = system.to_string();
            }
            EventKind::SupercruiseExit => {
                out.state = self.phrase(Phrase::InSystem(system));
                out.details = self.phrase(Phrase::FlyingNormalSpace);
            }
            EventKind::FSDJump => {
                out.state = self.phrase(Phrase::InSystem(system));
                out.details = self.phrase(Phrase::Supercruising);
                out.small_image = SmallIcon::System;
                out.small_text = system.to_string();
                out.effects.reset_anchor = true;
            }
            EventKind::Docked => {
                let station = event
                    .station
                    .as_deref()
                    .or(entry.station_name.as_deref())
                    .unwrap_or_default();
                out.state = self.phrase(Phrase::InSystem(system));
                out.details = self.phrase(Phrase::DockedAt(station));
                out.small_image = SmallIcon::Station;
                out.small_text = station.to_string();
                out.effects.reset_anchor = true;
            }
            EventKind::Undocked => {
                out.state = self.phrase(Phrase::InSystem(system));
                out.details = self.phrase(Phrase::FlyingNormalSpace);
                out.small_image = SmallIcon::System;
                out.small_text = system.to_string();
                out.effects.reset_anchor = true;
            }
            EventKind::Shutdown => {
                out.state = self.phrase(Phrase::ConnectingInterface);
                out.details.clear();
                out.small_image = SmallIcon::None;
                out.small_text.clear();
                out.effects.shutdown = true;
            }
            EventKind::DockingGranted => {
                if let Some(pad) = entry.landing_pad.as_deref() {
                    out.effects.landing_pad = pad.to_string();
                }
            }
            EventKind::Music => {
                if entry.music_track.as_deref() == Some("MainMenu") {
                    out.state = match self.menu {
                        MenuPresence::Connecting => self.phrase(Phrase::ConnectingInterface),
                        MenuPresence::InMenus => self.phrase(Phrase::InMenus),
                    };
                    out.details.clear();
                }
            }
            // Undocked is claimed above.
            EventKind::DockingCancelled | EventKind::DockingTimeout => {
                let station = entry.station_name.as_deref().unwrap_or_default();
                out.details = self.phrase(Phrase::FlyingNear(station));
            }
            EventKind::ApproachBody => {
                if let Some(body) = non_empty(entry.body.as_deref()) {
                    out.effects.current_planet = body.to_string();
                    out.details = self.phrase(Phrase::Approaching(body));
                    out.small_image = SmallIcon::Planet;
                    out.small_text = body.to_string();
                }
            }
            EventKind::Touchdown if entry.player_controlled == Some(true) => {
                out.details = self.phrase(Phrase::LandedOn(&out.effects.current_planet));
            }
            EventKind::Liftoff => {
                let planet = &out.effects.current_planet;
                out.details = if entry.player_controlled.unwrap_or(true) {
                    self.phrase(Phrase::FlyingAround(planet))
                } else {
                    self.phrase(Phrase::InSrvShipInOrbit(planet))
                };
            }
            EventKind::LeaveBody => {
                out.details = self.phrase(Phrase::Supercruising);
                out.small_image = SmallIcon::System;
                out.small_text = system.to_string();
            }
            EventKind::LaunchSRV => {
                out.details = self.phrase(Phrase::InSrv(&out.effects.current_planet));
            }
            EventKind::DockSRV => {
                out.details = self.phrase(Phrase::LandedOn(&out.effects.current_planet));
            }
            _ => {}
        }

        out
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
