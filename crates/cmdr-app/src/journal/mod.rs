//! Journal directory tailing and host-side location tracking.

mod tailer;
mod tracker;

pub use tailer::{is_journal_file, newest_journal, JournalBatch, JournalTailer};
pub use tracker::HostTracker;
