//! Elite Dangerous journal events to Discord rich presence.
//!
//! - [`Translator`] turns one journal event into presence text
//! - [`Supervisor`] owns the record and keeps the client connected
//! - [`PresenceAdapter`] and the [`Connector`] traits wrap the presence service
//! - [`PresencePlugin`] is the host-facing lifecycle surface

pub mod client;
pub mod gate;
pub mod localize;
pub mod plugin;
pub mod record;
pub mod supervisor;
pub mod translator;

#[cfg(test)]
mod testing;

pub use client::{
    Activity, CallKind, CallOutcome, Completion, ConnectParams, Connector, PresenceAdapter,
    PresenceTransport,
};
#[cfg(feature = "discord")]
pub use client::discord::{DiscordConnector, DiscordTransport};
pub use gate::{AlwaysEnabled, PresenceGate};
pub use localize::{Catalog, English, Localizer, Phrase};
pub use plugin::{PresencePlugin, PLUGIN_NAME};
pub use record::{PresenceRecord, SmallIcon};
pub use supervisor::{Phase, Supervisor, SupervisorConfig};
pub use translator::{MenuPresence, SideEffects, Translation, Translator};
