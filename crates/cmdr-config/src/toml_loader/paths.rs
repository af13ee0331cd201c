use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use cmdr_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

const APP_DIR: &str = "cmdr-presence";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/cmdr-presence/config.toml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Write the commented template to `path`.
///
/// Never overwrites: if another process created the file first, that file
/// is left alone and this returns `Ok`.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_err = |what: &str, p: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("{what} {}: {e}", p.display()))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err("cannot create", parent, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("config {} appeared concurrently, keeping it", path.display());
            return Ok(());
        }
        Err(e) => return Err(io_err("cannot create", path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_err("cannot write", path, e))?;

    info!("wrote default config to {}", path.display());
    Ok(())
}
