use serde::{Deserialize, Serialize};

/// Verbosity for this workspace's own log targets.
///
/// Accepts the host's historical spellings (`WARNING`, `INFO`, ...) as
/// aliases so old config files keep loading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[serde(alias = "TRACE")]
    Trace,
    #[serde(alias = "DEBUG")]
    Debug,
    #[default]
    #[serde(alias = "INFO")]
    Info,
    #[serde(alias = "WARNING", alias = "warning", alias = "WARN")]
    Warn,
    #[serde(alias = "ERROR")]
    Error,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Extra `tracing` filter directives, comma separated, appended after
    /// the level (e.g. `discord_sdk=debug`).
    pub filter: Option<String>,
}

impl LoggingConfig {
    /// Directives contributed by `filter`, with blanks dropped.
    pub fn extra_directives(&self) -> Vec<&str> {
        self.filter
            .as_deref()
            .map(|f| f.split(',').map(str::trim).filter(|d| !d.is_empty()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        logging: LoggingConfig,
    }

    fn parse(text: &str) -> LoggingConfig {
        toml::from_str::<Wrapper>(text).unwrap().logging
    }

    #[test]
    fn accepts_host_spellings() {
        assert_eq!(parse("[logging]\nlevel = \"WARNING\"").level, LogLevel::Warn);
        assert_eq!(parse("[logging]\nlevel = \"DEBUG\"").level, LogLevel::Debug);
        assert_eq!(parse("[logging]\nlevel = \"trace\"").level, LogLevel::Trace);
    }

    #[test]
    fn filter_splits_on_commas() {
        let logging = parse("[logging]\nfilter = \"discord_sdk=debug, ,notify=warn\"");
        assert_eq!(logging.extra_directives(), vec!["discord_sdk=debug", "notify=warn"]);
        assert!(LoggingConfig::default().extra_directives().is_empty());
    }
}
