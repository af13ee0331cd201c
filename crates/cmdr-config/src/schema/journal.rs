use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where and how the host reads the game journal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JournalConfig {
    /// Journal directory. Defaults to the game's folder under Saved Games.
    pub directory: Option<PathBuf>,
    /// How often the newest journal file is checked for new lines.
    pub poll_interval_ms: u32,
    /// Replay the newest journal from its first line instead of its end.
    pub from_start: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            directory: None,
            poll_interval_ms: 250,
            from_start: false,
        }
    }
}

impl JournalConfig {
    /// The configured directory, or the platform default location.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory.clone().or_else(default_journal_dir)
    }
}

fn default_journal_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join("Saved Games")
            .join("Frontier Developments")
            .join("Elite Dangerous")
    })
}
