use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Failures of the outbound presence client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// A handshake attempt failed. Retried by the supervisor, never surfaced.
    #[error("presence connect failed: {0}")]
    Connect(String),

    #[error("presence handshake timed out after {0}s")]
    HandshakeTimeout(u64),

    /// The channel to the presence service is no longer usable.
    #[error("presence channel disconnected: {0}")]
    Disconnected(String),

    /// An update or clear completed with a non-abort failure.
    #[error("presence call {call} failed: {message}")]
    Callback { call: String, message: String },

    /// The service rejected or failed a single update/clear request.
    #[error("presence request failed: {0}")]
    Request(String),

    #[error("presence client not connected")]
    NotConnected,

    #[error("launcher registration failed: {0}")]
    Registration(String),
}

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("journal directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("malformed journal line: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CmdrError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("connection.retry_interval_ms".into());
        assert_eq!(
            err.to_string(),
            "config validation error: connection.retry_interval_ms"
        );

        let err = ConfigError::WatchError("inotify limit reached".into());
        assert_eq!(err.to_string(), "config watch error: inotify limit reached");
    }

    #[test]
    fn client_error_display() {
        let err = ClientError::Connect("discord not running".into());
        assert_eq!(err.to_string(), "presence connect failed: discord not running");

        let err = ClientError::HandshakeTimeout(10);
        assert_eq!(err.to_string(), "presence handshake timed out after 10s");

        let err = ClientError::Callback {
            call: "1a2b3c4d".into(),
            message: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "presence call 1a2b3c4d failed: rate limited");
    }

    #[test]
    fn cmdr_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: CmdrError = config_err.into();
        assert!(matches!(err, CmdrError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn cmdr_error_from_client() {
        let err: CmdrError = ClientError::NotConnected.into();
        assert!(matches!(err, CmdrError::Client(_)));
        assert_eq!(err.to_string(), "presence client not connected");
    }

    #[test]
    fn journal_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: JournalError = json_err.into();
        assert!(matches!(err, JournalError::Malformed(_)));

        let err: CmdrError = err.into();
        assert!(err.to_string().starts_with("malformed journal line"));
    }

    #[test]
    fn cmdr_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CmdrError = io_err.into();
        assert!(matches!(err, CmdrError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }
}
