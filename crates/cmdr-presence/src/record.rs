//! The presence record owned by the supervisor.

use chrono::{DateTime, Utc};

use crate::translator::Translation;

/// Planet name shown before any body has been seen.
pub const HIDDEN_PLANET: &str = "<Hidden>";

/// Pad id before any docking permission has been granted.
pub const DEFAULT_LANDING_PAD: &str = "2";

/// Context icon shown next to the presence text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallIcon {
    #[default]
    None,
    System,
    Station,
    Planet,
}

impl SmallIcon {
    /// Asset key registered with the presence service, `None` for no icon.
    pub fn key(self) -> Option<&'static str> {
        match self {
            SmallIcon::None => None,
            SmallIcon::System => Some("system"),
            SmallIcon::Station => Some("station"),
            SmallIcon::Planet => Some("planet"),
        }
    }
}

/// Everything the bridge knows about the current presence.
///
/// The first group of fields is what gets published. The second group is
/// carried between events so later events can refer back to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRecord {
    pub state: String,
    pub details: String,
    pub time_start: DateTime<Utc>,
    pub large_image: String,
    pub large_text: String,
    pub small_image: SmallIcon,
    pub small_text: String,

    pub current_system: Option<String>,
    pub current_planet: String,
    pub landing_pad: String,
    /// The session is over; pushes clear instead of update.
    pub shutdown: bool,
}

impl PresenceRecord {
    /// A fresh record showing `placeholder`. No session has started yet, so
    /// the shutdown flag starts set.
    pub fn new(large_image: impl Into<String>, placeholder: String, now: DateTime<Utc>) -> Self {
        Self {
            state: placeholder,
            details: String::new(),
            time_start: now,
            large_image: large_image.into(),
            large_text: String::new(),
            small_image: SmallIcon::None,
            small_text: String::new(),
            current_system: None,
            current_planet: HIDDEN_PLANET.to_string(),
            landing_pad: DEFAULT_LANDING_PAD.to_string(),
            shutdown: true,
        }
    }

    /// Reset the published fields to `placeholder` after a new handshake.
    /// Location carry-over survives.
    pub fn reseed(&mut self, placeholder: String, now: DateTime<Utc>) {
        self.state = placeholder;
        self.details.clear();
        self.time_start = now;
        self.large_text.clear();
        self.small_image = SmallIcon::None;
        self.small_text.clear();
    }

    /// Fold a translation into the record.
    ///
    /// Carried fields and the time anchor always apply. The published
    /// fields are committed only when the state/details pair changed; the
    /// return value says whether that happened.
    pub fn apply(&mut self, translation: Translation, now: DateTime<Utc>) -> bool {
        let Translation {
            state,
            details,
            small_image,
            small_text,
            large_text,
            effects,
        } = translation;

        self.shutdown = effects.shutdown;
        self.current_system = effects.current_system;
        self.current_planet = effects.current_planet;
        self.landing_pad = effects.landing_pad;
        if effects.reset_anchor {
            self.time_start = now;
        }

        if state == self.state && details == self.details {
            return false;
        }

        self.state = state;
        self.details = details;
        self.large_text = large_text;
        self.small_image = small_image;
        self.small_text = small_text;
        true
    }
}
