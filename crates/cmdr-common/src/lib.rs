pub mod errors;
pub mod events;
pub mod id;

pub use errors::{ClientError, CmdrError, ConfigError, JournalError};
pub use events::{EventKind, HostEvent, JournalEntry};
pub use id::CallId;

pub type Result<T> = std::result::Result<T, CmdrError>;
