//! Lifecycle hooks called by the host.

use std::path::{Path, PathBuf};

use cmdr_common::HostEvent;
use tracing::info;

use crate::supervisor::Supervisor;

/// Identifier returned to the host from [`PresencePlugin::start`].
pub const PLUGIN_NAME: &str = "DiscordPresence";

pub struct PresencePlugin {
    supervisor: Supervisor,
}

impl PresencePlugin {
    pub fn new(supervisor: Supervisor) -> Self {
        Self { supervisor }
    }

    /// Begin connecting in the background and return the plugin identifier.
    pub fn start(&self, plugin_dir: &Path) -> &'static str {
        let hint = path_hint(plugin_dir);
        info!(plugin_dir = %plugin_dir.display(), "Starting {PLUGIN_NAME}");
        self.supervisor.start(hint);
        PLUGIN_NAME
    }

    /// Clear presence and disconnect. Returns once the clear has been
    /// delivered or timed out.
    pub async fn stop(&self) {
        self.supervisor.stop().await;
    }

    pub async fn journal_entry(&self, event: &HostEvent) {
        self.supervisor.handle_event(event).await;
    }

    /// The host saved its settings; the disabled flag may have flipped.
    pub async fn prefs_changed(&self) {
        self.supervisor.settings_changed().await;
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }
}

/// Sibling directory of `plugin_dir` named after the plugin.
fn path_hint(plugin_dir: &Path) -> Option<PathBuf> {
    plugin_dir.parent().map(|parent| parent.join(PLUGIN_NAME))
}
