//! Live config reload: the file watcher plus parse and validate.

mod manager;


pub use manager::ReloadManager;
