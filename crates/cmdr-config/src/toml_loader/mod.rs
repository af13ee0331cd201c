//! Reading the config file, and creating it from a template on first run.

mod loader;
mod paths;
mod template;


pub use loader::{load_from_path, load_or_create, load_or_default};
pub use paths::{create_default_config, default_config_path};
