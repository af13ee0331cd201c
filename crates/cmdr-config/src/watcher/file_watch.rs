use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cmdr_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Quiet period after the last filesystem event before a change is reported.
const SETTLE: Duration = Duration::from_millis(500);

/// Watches one config file. The parent directory is what `notify` sees,
/// since editors (and [`crate::toml_writer`]) replace the file by rename.
pub struct ConfigWatcher {
    path: PathBuf,
    dir: PathBuf,
    file_name: OsString,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| ConfigError::WatchError(format!("{} has no file name", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !path.exists() {
            debug!("{} does not exist yet, watching for creation", path.display());
        }
        Ok(Self {
            path,
            dir,
            file_name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Send one `()` on `changes` per settled burst of edits.
    ///
    /// Returns once `changes` has no receiver left.
    pub async fn run(self, changes: mpsc::Sender<()>) -> Result<(), ConfigError> {
        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<()>();
        let file_name = self.file_name.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if concerns(&event, &file_name) => {
                    let _ = raw_tx.send(());
                }
                Ok(_) => {}
                Err(e) => error!("config watch backend error: {e}"),
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("cannot start watcher: {e}")))?;
        watcher
            .watch(&self.dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(format!("cannot watch {}: {e}", self.dir.display())))?;

        info!("watching {}", self.path.display());

        let mut deadline: Option<Instant> = None;
        loop {
            tokio::select! {
                raw = raw_rx.recv() => {
                    if raw.is_none() {
                        break;
                    }
                    deadline = Some(Instant::now() + SETTLE);
                }
                _ = async { tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)).await },
                    if deadline.is_some() =>
                {
                    deadline = None;
                    debug!("{} settled after edit", self.path.display());
                    if changes.send(()).await.is_err() {
                        break;
                    }
                }
                _ = changes.closed() => break,
            }
        }
        Ok(())
    }
}

fn concerns(event: &Event, file_name: &OsString) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant && event.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str()))
}
