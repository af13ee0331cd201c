//! Debounced change notifications for the config file.

mod file_watch;


pub use file_watch::ConfigWatcher;
