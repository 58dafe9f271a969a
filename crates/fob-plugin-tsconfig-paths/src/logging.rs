//! Diagnostic verbosity for the tsconfig paths plugin
//!
//! The plugin only emits `tracing` events. This level decides which of those
//! events are emitted at all, independently of the subscriber the host
//! application installs.

use serde::{Deserialize, Serialize};

/// How much the plugin reports about mapping compilation and resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No diagnostics
    #[serde(alias = "off", alias = "silent")]
    None,
    /// Rejected patterns and targets (default)
    #[default]
    #[serde(alias = "warning")]
    Warn,
    /// Rejections plus compiled rules and every successful rewrite
    Debug,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::None => "none",
            LogLevel::Warn => "warn",
            LogLevel::Debug => "debug",
        }
    }

    /// Whether rejected entries should be reported
    pub fn warns(&self) -> bool {
        matches!(self, LogLevel::Warn | LogLevel::Debug)
    }

    /// Whether compiled rules and rewrites should be reported
    pub fn debugs(&self) -> bool {
        matches!(self, LogLevel::Debug)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "off" | "silent" => Ok(LogLevel::None),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("Invalid log level: {}", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("none".parse::<LogLevel>().unwrap(), LogLevel::None);
        assert_eq!("off".parse::<LogLevel>().unwrap(), LogLevel::None);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("info".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::None.to_string(), "none");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_thresholds() {
        assert!(!LogLevel::None.warns());
        assert!(LogLevel::Warn.warns());
        assert!(!LogLevel::Warn.debugs());
        assert!(LogLevel::Debug.warns());
        assert!(LogLevel::Debug.debugs());
    }

    #[test]
    fn test_log_level_serde() {
        let level: LogLevel = serde_json::from_str("\"silent\"").unwrap();
        assert_eq!(level, LogLevel::None);
        assert_eq!(serde_json::to_string(&LogLevel::Debug).unwrap(), "\"debug\"");
    }
}
