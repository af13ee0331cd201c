use std::path::PathBuf;

use cmdr_common::ConfigError;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::schema::CmdrConfig;
use crate::toml_loader;
use crate::validation;
use crate::watcher::ConfigWatcher;

/// Republishes the config file on a `watch` channel whenever it changes.
///
/// Only edits that produce a different, valid config are published, so
/// receivers do not wake for touches or for a rewrite of the same values.
pub struct ReloadManager {
    path: PathBuf,
    published: watch::Sender<CmdrConfig>,
}

impl ReloadManager {
    /// Load `path` (creating a default file if needed, falling back to
    /// defaults if it is invalid) and start following it in the background.
    ///
    /// The background task ends once every receiver is dropped.
    pub async fn start(path: PathBuf) -> (CmdrConfig, watch::Receiver<CmdrConfig>) {
        let initial = toml_loader::load_or_default(&path);
        let (published, rx) = watch::channel(initial.clone());

        let manager = ReloadManager { path, published };
        tokio::spawn(manager.follow());

        (initial, rx)
    }

    async fn follow(self) {
        let watcher = match ConfigWatcher::new(self.path.clone()) {
            Ok(watcher) => watcher,
            Err(e) => {
                error!("live reload disabled: {e}");
                return;
            }
        };
        let (changes_tx, mut changes) = mpsc::channel(1);
        let watch_task = tokio::spawn(watcher.run(changes_tx));

        loop {
            tokio::select! {
                change = changes.recv() => {
                    if change.is_none() {
                        break;
                    }
                    self.reload();
                }
                _ = self.published.closed() => {
                    debug!("no config subscribers left");
                    break;
                }
            }
        }

        watch_task.abort();
        match watch_task.await {
            Ok(Err(e)) => error!("config watcher failed: {e}"),
            _ => debug!("stopped following {}", self.path.display()),
        }
    }

    fn reload(&self) {
        let fresh = match read_checked(&self.path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring edit to {}: {e}", self.path.display());
                return;
            }
        };
        let changed = self.published.send_if_modified(|current| {
            if *current == fresh {
                return false;
            }
            *current = fresh;
            true
        });
        if changed {
            info!("reloaded {}", self.path.display());
        }
    }
}

fn read_checked(path: &std::path::Path) -> Result<CmdrConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}
