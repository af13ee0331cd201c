//! Config schema. Every section is `serde(default)`, so a file only needs
//! the keys it overrides.

mod connection;
mod journal;
mod logging;
mod presence;

pub use connection::*;
pub use journal::*;
pub use logging::*;
pub use presence::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CmdrConfig {
    pub presence: PresenceConfig,
    pub connection: ConnectionConfig,
    pub journal: JournalConfig,
    pub logging: LoggingConfig,
}
