//! Settings for the presence bridge: a commented TOML file under the
//! platform config directory, validated on load and followed live by
//! [`ReloadManager`].

pub mod reload;
pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;
pub mod watcher;

pub use reload::ReloadManager;
pub use schema::{CmdrConfig, MenuLabel};
pub use toml_writer::{save_config_to_path, set_presence_disabled};
pub use watcher::ConfigWatcher;

pub fn config_to_json(config: &CmdrConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_view_lists_sections_and_labels() {
        let json: serde_json::Value =
            serde_json::from_str(&config_to_json(&CmdrConfig::default())).unwrap();
        for section in ["presence", "connection", "journal", "logging"] {
            assert!(json.get(section).is_some(), "missing {section}");
        }
        assert_eq!(json["presence"]["menu_label"], "in_menus");
        assert_eq!(json["logging"]["level"], "info");
    }

    #[test]
    fn json_view_reads_back_identically() {
        let mut config = CmdrConfig::default();
        config.presence.disabled = true;
        config.connection.max_retry_interval_ms = 2_000;
        let parsed: CmdrConfig = serde_json::from_str(&config_to_json(&config)).unwrap();
        assert_eq!(parsed, config);
    }
}
