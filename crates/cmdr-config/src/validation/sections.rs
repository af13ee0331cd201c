//! Per-section validators.

use std::ops::RangeInclusive;

use crate::schema::CmdrConfig;

fn check_range(errors: &mut Vec<String>, name: &str, value: u32, allowed: RangeInclusive<u32>) {
    if !allowed.contains(&value) {
        errors.push(format!(
            "{name} = {value} is out of range [{}, {}]",
            allowed.start(),
            allowed.end()
        ));
    }
}

/// Validate presence identifiers.
pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &CmdrConfig) {
    if config.presence.client_id <= 0 {
        errors.push(format!(
            "presence.client_id = {} must be positive",
            config.presence.client_id
        ));
    }
    if config.presence.large_image.trim().is_empty() {
        errors.push("presence.large_image must not be empty".into());
    }
}

/// Validate retry and poll timing.
pub(crate) fn validate_connection(errors: &mut Vec<String>, config: &CmdrConfig) {
    let conn = &config.connection;
    check_range(errors, "connection.retry_interval_ms", conn.retry_interval_ms, 10..=60_000);
    check_range(errors, "connection.poll_interval_ms", conn.poll_interval_ms, 10..=10_000);
    check_range(errors, "connection.handshake_timeout_secs", conn.handshake_timeout_secs, 1..=120);
    if conn.max_retry_interval_ms < conn.retry_interval_ms {
        errors.push(format!(
            "connection.max_retry_interval_ms = {} is below retry_interval_ms = {}",
            conn.max_retry_interval_ms, conn.retry_interval_ms
        ));
    }
}

/// Validate journal polling.
pub(crate) fn validate_journal(errors: &mut Vec<String>, config: &CmdrConfig) {
    check_range(errors, "journal.poll_interval_ms", config.journal.poll_interval_ms, 50..=10_000);
}
