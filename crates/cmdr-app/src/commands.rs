//! Subcommand implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cmdr_common::{CmdrError, JournalEntry, JournalError};
use cmdr_config::{config_to_json, set_presence_disabled, toml_loader, CmdrConfig, ReloadManager};
use cmdr_presence::{
    Connector, DiscordConnector, Phase, PresencePlugin, Supervisor, Translator,
};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::journal::{HostTracker, JournalTailer};
use crate::settings::{localizer, menu_presence, supervisor_config, ConfigGate};

pub fn build_plugin(
    config: &CmdrConfig,
    live: watch::Receiver<CmdrConfig>,
    connector: Arc<dyn Connector>,
) -> PresencePlugin {
    let translator = Translator::new(
        localizer(config),
        menu_presence(config.presence.menu_label),
    );
    PresencePlugin::new(Supervisor::new(
        supervisor_config(config),
        connector,
        translator,
        Arc::new(ConfigGate::new(live)),
    ))
}

/// Directory the binary lives in, standing in for the host's plugin dir.
fn plugin_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Parse one journal line and hand it to the plugin. Malformed lines are
/// skipped.
pub async fn feed_line(plugin: &PresencePlugin, tracker: &mut HostTracker, line: &str) {
    match JournalEntry::parse(line) {
        Ok(entry) => {
            let event = tracker.observe(entry);
            plugin.journal_entry(&event).await;
        }
        Err(e) => warn!(error = %e, "Skipping malformed journal line"),
    }
}

/// Read what the tailer has and feed it through. Backlog lines only update
/// the tracker; new lines reach the plugin.
pub async fn pump(
    plugin: &PresencePlugin,
    tailer: &mut JournalTailer,
    tracker: &mut HostTracker,
) -> Result<(), JournalError> {
    let batch = tailer.read_available().await?;
    if !batch.backlog.is_empty() {
        let applied = tracker.catch_up(&batch.backlog);
        info!(
            applied,
            commander = %tracker.commander,
            system = tracker.system.as_deref().unwrap_or("-"),
            "Caught up on existing journal"
        );
    }
    for line in batch.lines {
        feed_line(plugin, tracker, &line).await;
    }
    Ok(())
}

pub async fn run(
    config_path: PathBuf,
    journal_dir: Option<PathBuf>,
    from_start: bool,
) -> Result<(), CmdrError> {
    let (config, mut config_rx) = ReloadManager::start(config_path).await;

    let dir = journal_dir
        .or_else(|| config.journal.resolved_directory())
        .ok_or_else(|| CmdrError::Other("no journal directory; pass --journal-dir".into()))?;
    if !dir.is_dir() {
        return Err(JournalError::DirectoryNotFound(dir).into());
    }

    let plugin = build_plugin(&config, config_rx.clone(), Arc::new(DiscordConnector));
    let name = plugin.start(&plugin_dir());
    info!(plugin = name, journal_dir = %dir.display(), "Presence bridge running");

    let mut tailer = JournalTailer::new(dir, from_start || config.journal.from_start);
    let mut tracker = HostTracker::new();
    let mut ticker =
        tokio::time::interval(Duration::from_millis(config.journal.poll_interval_ms.into()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut disabled = config.presence.disabled;
    let mut config_live = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Ctrl-C received, stopping");
                break;
            }
            changed = config_rx.changed(), if config_live => {
                if changed.is_err() {
                    warn!("Config reload stopped; keeping current settings");
                    config_live = false;
                    continue;
                }
                let now = config_rx.borrow_and_update().presence.disabled;
                if now != disabled {
                    disabled = now;
                    info!(disabled, "Presence setting changed");
                    plugin.prefs_changed().await;
                }
            }
            _ = ticker.tick() => {
                if let Err(e) = pump(&plugin, &mut tailer, &mut tracker).await {
                    warn!(error = %e, "Failed to read journal");
                }
            }
        }
    }

    plugin.stop().await;
    Ok(())
}

pub async fn replay(config_path: PathBuf, file: PathBuf) -> Result<(), CmdrError> {
    let config = toml_loader::load_or_default(&config_path);
    let text = tokio::fs::read_to_string(&file)
        .await
        .map_err(JournalError::Io)?;

    let (_config_tx, config_rx) = watch::channel(config.clone());
    let plugin = build_plugin(&config, config_rx, Arc::new(DiscordConnector));
    plugin.start(&plugin_dir());

    let wait = Duration::from_secs(config.connection.handshake_timeout_secs.into());
    let mut phase = plugin.supervisor().subscribe_phase();
    if tokio::time::timeout(wait, phase.wait_for(|p| *p == Phase::Ready))
        .await
        .is_err()
    {
        warn!("Presence service not reachable, replaying without publishing");
    }

    let mut tracker = HostTracker::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        feed_line(&plugin, &mut tracker, line).await;
    }

    let record = plugin.supervisor().record().await;
    info!(
        file = %file.display(),
        state = %record.state,
        details = %record.details,
        "Replay finished"
    );
    plugin.stop().await;
    Ok(())
}

pub fn set_disabled(config_path: &Path, disabled: bool) -> Result<(), CmdrError> {
    let config = set_presence_disabled(config_path, disabled)?;
    let word = if config.presence.disabled {
        "disabled"
    } else {
        "enabled"
    };
    println!("Presence {word} ({})", config_path.display());
    Ok(())
}

pub fn print_config(config_path: &Path) -> Result<(), CmdrError> {
    let config = toml_loader::load_or_create(config_path)?;
    println!("{}", config_to_json(&config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_plugin(config: &CmdrConfig) -> PresencePlugin {
        let (_tx, rx) = watch::channel(config.clone());
        // Never started, so the connector is never used.
        build_plugin(config, rx, Arc::new(DiscordConnector))
    }

    #[tokio::test]
    async fn journal_lines_drive_the_record() {
        let plugin = offline_plugin(&CmdrConfig::default());
        let mut tracker = HostTracker::new();

        for line in [
            r#"{"event":"Commander","Name":"Jameson"}"#,
            r#"{"event":"Location","StarSystem":"Sol","Docked":true,"StationName":"Galileo"}"#,
            "not json",
            r#"{"event":"Undocked","StationName":"Galileo"}"#,
            r#"{"event":"ApproachBody","StarSystem":"Sol","Body":"Earth"}"#,
        ] {
            feed_line(&plugin, &mut tracker, line).await;
        }

        let record = plugin.supervisor().record().await;
        assert_eq!(record.state, "In system Sol");
        assert_eq!(record.details, "Approaching Earth");
        assert_eq!(record.large_text, "CMDR Jameson");
        assert_eq!(record.current_planet, "Earth");
    }

    #[tokio::test]
    async fn main_menu_label_follows_config() {
        let mut config = CmdrConfig::default();
        config.presence.menu_label = cmdr_config::MenuLabel::Connecting;
        let plugin = offline_plugin(&config);
        let mut tracker = HostTracker::new();

        feed_line(&plugin, &mut tracker, r#"{"event":"Location","StarSystem":"Sol"}"#).await;
        feed_line(
            &plugin,
            &mut tracker,
            r#"{"event":"Music","MusicTrack":"MainMenu"}"#,
        )
        .await;

        let record = plugin.supervisor().record().await;
        assert_eq!(record.state, "Connecting CMDR Interface");
        assert!(record.details.is_empty());
    }

    #[tokio::test]
    async fn existing_journal_sets_context_for_new_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Journal.2024-03-01T100000.01.log");
        std::fs::write(
            &path,
            concat!(
                r#"{"event":"Commander","Name":"Jameson"}"#,
                "\n",
                r#"{"event":"Location","StarSystem":"Sol","Docked":true,"StationName":"Galileo"}"#,
                "\n",
            ),
        )
        .unwrap();

        let plugin = offline_plugin(&CmdrConfig::default());
        let mut tailer = JournalTailer::new(dir.path().to_path_buf(), false);
        let mut tracker = HostTracker::new();

        pump(&plugin, &mut tailer, &mut tracker).await.unwrap();
        let record = plugin.supervisor().record().await;
        assert_eq!(record.state, "Connecting CMDR Interface");

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        std::io::Write::write_all(
            &mut file,
            b"{\"event\":\"Undocked\",\"StationName\":\"Galileo\"}\n",
        )
        .unwrap();
        pump(&plugin, &mut tailer, &mut tracker).await.unwrap();

        let record = plugin.supervisor().record().await;
        assert_eq!(record.state, "In system Sol");
        assert_eq!(record.details, "Flying in normal space");
        assert_eq!(record.large_text, "CMDR Jameson");
        assert_eq!(record.small_text, "Sol");
    }

    #[test]
    fn toggles_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set_disabled(&path, true).unwrap();
        let config = toml_loader::load_from_path(&path).unwrap();
        assert!(config.presence.disabled);

        set_disabled(&path, false).unwrap();
        let config = toml_loader::load_from_path(&path).unwrap();
        assert!(!config.presence.disabled);
    }

    #[test]
    fn print_config_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        print_config(&path).unwrap();
        assert!(path.exists());
    }
}
