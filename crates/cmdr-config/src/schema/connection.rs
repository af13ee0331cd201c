use serde::{Deserialize, Serialize};

/// Timing of the connect/retry loop and the callback poll cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Delay between handshake attempts, in milliseconds.
    pub retry_interval_ms: u32,
    /// Upper bound for the retry delay. Equal to `retry_interval_ms` means
    /// a fixed interval; larger values enable doubling backoff.
    pub max_retry_interval_ms: u32,
    /// Cadence of the callback poll, in milliseconds.
    pub poll_interval_ms: u32,
    /// How long to wait for the presence service to answer a handshake.
    pub handshake_timeout_secs: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            retry_interval_ms: 100,
            max_retry_interval_ms: 100,
            poll_interval_ms: 100,
            handshake_timeout_secs: 10,
        }
    }
}
