//! Presence configuration types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discord application the presence is published under.
pub const DEFAULT_CLIENT_ID: i64 = 1169952579745230888;

/// Steam app id used for the launcher linkage.
pub const DEFAULT_STEAM_APP_ID: u32 = 359320;

/// Label shown while the commander sits in the main menu.
///
/// Older hosts showed the connecting placeholder, newer ones say "In menus".
/// Resolved once at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MenuLabel {
    Connecting,
    #[default]
    InMenus,
}

/// Presence publishing configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PresenceConfig {
    /// The settings toggle. When set, every push degrades to a clear.
    pub disabled: bool,
    pub client_id: i64,
    /// Steam app id for launcher registration. `0` skips registration.
    pub steam_app_id: u32,
    pub large_image: String,
    pub menu_label: MenuLabel,
    /// Translations keyed by the English template, e.g.
    /// `"In system {system}" = "Im System {system}"`. Missing keys stay English.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub phrases: BTreeMap<String, String>,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            client_id: DEFAULT_CLIENT_ID,
            steam_app_id: DEFAULT_STEAM_APP_ID,
            large_image: "elite".into(),
            menu_label: MenuLabel::InMenus,
            phrases: BTreeMap::new(),
        }
    }
}
