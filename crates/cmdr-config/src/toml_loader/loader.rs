use std::io::ErrorKind;
use std::path::Path;

use cmdr_common::ConfigError;
use tracing::{info, warn};

use super::paths::create_default_config;
use crate::schema::CmdrConfig;
use crate::validation;

/// Parse the TOML file at `path`, filling omitted keys with defaults.
///
/// Out-of-range values only produce a warning here; callers that must
/// reject them run [`validation::validate`] themselves.
pub fn load_from_path(path: &Path) -> Result<CmdrConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("cannot read {}: {e}", path.display())),
    })?;

    let config: CmdrConfig = toml::from_str(&text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!("{}: {e}", path.display());
    }
    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Like [`load_from_path`], but a missing file is first created from the
/// commented template.
pub fn load_or_create(path: &Path) -> Result<CmdrConfig, ConfigError> {
    match load_from_path(path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(path)?;
            load_from_path(path)
        }
        other => other,
    }
}

/// The config at `path` if it loads and validates, defaults otherwise.
///
/// Used at startup, where a zero interval or similar would stall or crash
/// the timers that read it.
pub fn load_or_default(path: &Path) -> CmdrConfig {
    let checked = load_or_create(path).and_then(|config| {
        validation::validate(&config)?;
        Ok(config)
    });
    checked.unwrap_or_else(|e| {
        warn!("config {} unusable ({e}), starting from defaults", path.display());
        CmdrConfig::default()
    })
}
