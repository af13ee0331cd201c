//! Mapping from the loaded config to the presence core.

use std::sync::Arc;
use std::time::Duration;

use cmdr_config::schema::LogLevel;
use cmdr_config::{CmdrConfig, MenuLabel};
use cmdr_presence::{
    Catalog, ConnectParams, English, Localizer, MenuPresence, PresenceGate, SupervisorConfig,
};
use tokio::sync::watch;

const STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Reads `presence.disabled` from the live config on every call.
pub struct ConfigGate {
    config: watch::Receiver<CmdrConfig>,
}

impl ConfigGate {
    pub fn new(config: watch::Receiver<CmdrConfig>) -> Self {
        Self { config }
    }
}

impl PresenceGate for ConfigGate {
    fn presence_disabled(&self) -> bool {
        self.config.borrow().presence.disabled
    }
}

pub fn supervisor_config(config: &CmdrConfig) -> SupervisorConfig {
    let presence = &config.presence;
    let connection = &config.connection;
    SupervisorConfig {
        connect: ConnectParams {
            client_id: presence.client_id,
            steam_app_id: (presence.steam_app_id != 0).then_some(presence.steam_app_id),
            handshake_timeout: Duration::from_secs(connection.handshake_timeout_secs.into()),
            path_hint: None,
        },
        retry_interval: Duration::from_millis(connection.retry_interval_ms.into()),
        max_retry_interval: Duration::from_millis(connection.max_retry_interval_ms.into()),
        poll_interval: Duration::from_millis(connection.poll_interval_ms.into()),
        large_image: presence.large_image.clone(),
        stop_timeout: STOP_TIMEOUT,
    }
}

pub fn menu_presence(label: MenuLabel) -> MenuPresence {
    match label {
        MenuLabel::Connecting => MenuPresence::Connecting,
        MenuLabel::InMenus => MenuPresence::InMenus,
    }
}

/// English unless `[presence.phrases]` supplies translations.
pub fn localizer(config: &CmdrConfig) -> Arc<dyn Localizer> {
    let phrases = &config.presence.phrases;
    if phrases.is_empty() {
        Arc::new(English)
    } else {
        Arc::new(phrases.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Catalog>())
    }
}

/// Filter directives applying `level` to this workspace's crates.
pub fn log_directives(level: &str) -> Vec<String> {
    if level.contains('=') {
        return level.split(',').map(str::to_string).collect();
    }
    ["cmdr", "cmdr_presence", "cmdr_config", "cmdr_common"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect()
}

/// Directives from the `[logging]` section, or `info` without a config.
pub fn config_log_directives(config: Option<&CmdrConfig>) -> Vec<String> {
    let Some(config) = config else {
        return log_directives(LogLevel::default().as_directive());
    };
    let mut directives = log_directives(config.logging.level.as_directive());
    directives.extend(config.logging.extra_directives().into_iter().map(str::to_string));
    directives
}
