//! Persisting [`CmdrConfig`] back to TOML.
//!
//! Writes land in a `.tmp` sibling and are renamed into place, so the
//! watcher never reloads a half-written file.

use std::path::Path;

use cmdr_common::ConfigError;

use crate::schema::CmdrConfig;

fn io_error(action: &str, path: &Path, e: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {action} {}: {e}", path.display()))
}

/// Serialize `config` to `path`, creating missing parent directories.
pub fn save_config_to_path(config: &CmdrConfig, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("cannot serialize config: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error("create", parent, e))?;
    }

    let staging = path.with_extension("toml.tmp");
    std::fs::write(&staging, &text).map_err(|e| io_error("write", &staging, e))?;

    if let Err(e) = std::fs::rename(&staging, path) {
        // Rename over an open file fails on Windows.
        tracing::warn!("rename into {} failed ({e}), writing in place", path.display());
        let _ = std::fs::remove_file(&staging);
        std::fs::write(path, &text).map_err(|e| io_error("write", path, e))?;
    }

    tracing::debug!(path = %path.display(), "config written");
    Ok(())
}

/// Flip the presence toggle in the file at `path`, keeping everything else.
///
/// A missing file is treated as the default config.
pub fn set_presence_disabled(path: &Path, disabled: bool) -> Result<CmdrConfig, ConfigError> {
    let mut config = match crate::toml_loader::load_from_path(path) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) => CmdrConfig::default(),
        Err(e) => return Err(e),
    };
    config.presence.disabled = disabled;
    save_config_to_path(&config, path)?;
    tracing::info!(disabled, "presence setting saved");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MenuLabel;
    use tempfile::TempDir;

    #[test]
    fn save_config_writes_valid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = CmdrConfig::default();
        save_config_to_path(&config, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: CmdrConfig = toml::from_str(&contents).unwrap();
        assert_eq!(parsed.presence.client_id, config.presence.client_id);
        assert_eq!(parsed.connection.poll_interval_ms, 100);
    }

    #[test]
    fn save_config_keeps_non_default_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CmdrConfig::default();
        config.presence.menu_label = MenuLabel::Connecting;
        config.journal.directory = Some(dir.path().join("journals"));
        config.connection.max_retry_interval_ms = 5_000;
        save_config_to_path(&config, &path).unwrap();

        let parsed = crate::toml_loader::load_from_path(&path).unwrap();
        assert_eq!(parsed.presence.menu_label, MenuLabel::Connecting);
        assert_eq!(parsed.journal.directory, Some(dir.path().join("journals")));
        assert_eq!(parsed.connection.max_retry_interval_ms, 5_000);
    }

    #[test]
    fn save_config_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("config.toml");

        save_config_to_path(&CmdrConfig::default(), &path).unwrap();

        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[presence]"));
    }

    #[test]
    fn save_config_cleans_up_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        save_config_to_path(&CmdrConfig::default(), &path).unwrap();

        let tmp_path = path.with_extension("toml.tmp");
        assert!(!tmp_path.exists(), "tmp file should be renamed away");
    }

    #[test]
    fn set_presence_disabled_preserves_other_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[connection]
poll_interval_ms = 500
"#,
        )
        .unwrap();

        let config = set_presence_disabled(&path, true).unwrap();
        assert!(config.presence.disabled);

        let parsed = crate::toml_loader::load_from_path(&path).unwrap();
        assert!(parsed.presence.disabled);
        assert_eq!(parsed.connection.poll_interval_ms, 500);

        let config = set_presence_disabled(&path, false).unwrap();
        assert!(!config.presence.disabled);
    }

    #[test]
    fn set_presence_disabled_on_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        set_presence_disabled(&path, true).unwrap();
        let parsed = crate::toml_loader::load_from_path(&path).unwrap();
        assert!(parsed.presence.disabled);
        assert_eq!(parsed.presence.large_image, "elite");
    }
}
