//! Logging configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive for the workspace crates.
    pub fn directive(self) -> String {
        let level = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        format!("sidechat={level}")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_targets_workspace() {
        assert_eq!(LogLevel::Debug.directive(), "sidechat=debug");
        assert_eq!(LogLevel::default().directive(), "sidechat=info");
    }

    #[test]
    fn parses_lowercase_level() {
        let cfg: LoggingConfig = toml::from_str("level = \"warn\"").unwrap();
        assert_eq!(cfg.level, LogLevel::Warn);
    }
}
