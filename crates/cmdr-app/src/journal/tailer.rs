//! Incremental reader for the newest journal file in a directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use cmdr_common::JournalError;
use regex::Regex;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// `Journal.2024-03-01T182204.01.log` and the older
/// `Journal.240301182204.01.log`.
static JOURNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Journal(Beta)?\.[0-9T\-]+\.\d+\.log$").expect("journal pattern must compile")
});

pub fn is_journal_file(name: &str) -> bool {
    JOURNAL_RE.is_match(name)
}

/// Most recently modified journal in `dir`. Names break ties, since the
/// timestamp in the name sorts in creation order.
pub fn newest_journal(dir: &Path) -> Result<Option<PathBuf>, JournalError> {
    if !dir.is_dir() {
        return Err(JournalError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut newest: Option<(SystemTime, String, PathBuf)> = None;
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if is_journal_file(name) => name.to_string(),
            _ => continue,
        };
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(_) => continue,
        };
        let candidate = (modified, name, path);
        if newest
            .as_ref()
            .map_or(true, |best| (&candidate.0, &candidate.1) > (&best.0, &best.1))
        {
            newest = Some(candidate);
        }
    }
    Ok(newest.map(|(_, _, path)| path))
}

/// Lines returned by one [`JournalTailer::read_available`] call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct JournalBatch {
    /// Lines that were already in the journal when tailing began. They
    /// describe where the commander is but are not new events.
    pub backlog: Vec<String>,
    pub lines: Vec<String>,
}

struct OpenJournal {
    path: PathBuf,
    reader: BufReader<File>,
    /// Text read past the last newline, waiting for the rest of the line.
    pending: String,
}

/// Follows the newest journal in a directory, switching when the game
/// starts a new file.
pub struct JournalTailer {
    dir: PathBuf,
    from_start: bool,
    current: Option<OpenJournal>,
}

impl JournalTailer {
    /// With `from_start` unset, the content of the file that is newest at the
    /// first read is returned as backlog. Files that appear later are always
    /// returned as new lines.
    pub fn new(dir: PathBuf, from_start: bool) -> Self {
        Self {
            dir,
            from_start,
            current: None,
        }
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|j| j.path.as_path())
    }

    /// Complete lines written since the last call.
    pub async fn read_available(&mut self) -> Result<JournalBatch, JournalError> {
        let mut batch = JournalBatch::default();

        if let Some(newest) = newest_journal(&self.dir)? {
            let switched = self.current_path() != Some(newest.as_path());
            if switched {
                // Drain what is left of the old file before moving on.
                if let Some(old) = self.current.as_mut() {
                    read_lines(old, &mut batch.lines).await?;
                }
                let catch_up = self.current.is_none() && !self.from_start;
                let mut journal = open(newest).await?;
                if catch_up {
                    read_lines(&mut journal, &mut batch.backlog).await?;
                    debug!(
                        path = %journal.path.display(),
                        lines = batch.backlog.len(),
                        "Read existing journal content as backlog"
                    );
                }
                self.current = Some(journal);
            }
        }

        if let Some(journal) = self.current.as_mut() {
            read_lines(journal, &mut batch.lines).await?;
        }
        Ok(batch)
    }
}

async fn open(path: PathBuf) -> Result<OpenJournal, JournalError> {
    let file = File::open(&path).await?;
    info!(path = %path.display(), "Following journal");
    Ok(OpenJournal {
        path,
        reader: BufReader::new(file),
        pending: String::new(),
    })
}

async fn read_lines(journal: &mut OpenJournal, out: &mut Vec<String>) -> Result<(), JournalError> {
    loop {
        let read = journal.reader.read_line(&mut journal.pending).await?;
        if read == 0 {
            return Ok(());
        }
        if journal.pending.ends_with('\n') {
            let line = journal.pending.trim_end_matches(['\r', '\n']).to_string();
            journal.pending.clear();
            if !line.trim().is_empty() {
                out.push(line);
            }
        }
    }
}
