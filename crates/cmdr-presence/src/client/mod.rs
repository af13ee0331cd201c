//! Outbound presence client.
//!
//! [`Connector`] performs the handshake and hands back a
//! [`PresenceTransport`]. [`PresenceAdapter`] wraps a transport with
//! fire-and-forget calls whose outcomes are collected by `poll_once`.

mod adapter;
#[cfg(feature = "discord")]
pub mod discord;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cmdr_common::ClientError;

use crate::record::PresenceRecord;

pub use adapter::{CallKind, CallOutcome, Completion, PresenceAdapter};

/// Snapshot of the record in the shape the presence service wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub state: String,
    pub details: String,
    pub start: DateTime<Utc>,
    pub large_image: String,
    pub large_text: String,
    pub small_image: Option<String>,
    pub small_text: String,
}

impl From<&PresenceRecord> for Activity {
    fn from(record: &PresenceRecord) -> Self {
        Self {
            state: record.state.clone(),
            details: record.details.clone(),
            start: record.time_start,
            large_image: record.large_image.clone(),
            large_text: record.large_text.clone(),
            small_image: record.small_image.key().map(String::from),
            small_text: record.small_text.clone(),
        }
    }
}

/// Everything a handshake needs.
#[derive(Debug, Clone)]
pub struct ConnectParams {
    pub client_id: i64,
    /// Store id used to let the presence service launch the game.
    pub steam_app_id: Option<u32>,
    pub handshake_timeout: Duration,
    /// Where the plugin lives. Only used by transports that load helpers
    /// from disk.
    pub path_hint: Option<PathBuf>,
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, params: &ConnectParams)
        -> Result<Arc<dyn PresenceTransport>, ClientError>;

    /// Register the launcher linkage with the presence service.
    fn register_launcher(&self, params: &ConnectParams) -> Result<(), ClientError>;
}

/// One established channel to the presence service.
#[async_trait]
pub trait PresenceTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn update_activity(&self, activity: &Activity) -> Result<(), ClientError>;

    async fn clear_activity(&self) -> Result<(), ClientError>;

    /// Fails once the channel can no longer carry calls.
    fn check_alive(&self) -> Result<(), ClientError>;

    async fn disconnect(&self);
}
