//! Core types for the logging facade.
//!
//! This module provides:
//! - [`Level`] — Severity levels for log entries
//! - [`LogEntry`] — A captured log record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Log severity levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Debugging information
    Debug,
    /// General information
    Info,
    /// Warning conditions
    Warn,
    /// Error conditions
    Error,
}

impl Level {
    /// Returns true if this level is at least as severe as the given level.
    #[must_use]
    pub fn is_at_least(&self, level: Self) -> bool {
        *self >= level
    }

    /// Returns the upper-case string representation of this level, as used
    /// by [`crate::Scavenger::dump`] and the console backend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(LogError::InvalidLevel(other.to_string())),
        }
    }
}

/// A captured log record: the severity and the fully rendered message,
/// including any appended field block. Immutable once appended to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity level
    pub level: Level,
    /// The rendered message body, trailing newline stripped
    pub message: String,
}

impl LogEntry {
    /// Creates a new log entry.
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn level_is_at_least() {
        assert!(Level::Error.is_at_least(Level::Debug));
        assert!(Level::Error.is_at_least(Level::Error));
        assert!(!Level::Debug.is_at_least(Level::Info));
    }

    #[test_case(Level::Debug, "DEBUG")]
    #[test_case(Level::Info, "INFO")]
    #[test_case(Level::Warn, "WARN")]
    #[test_case(Level::Error, "ERROR")]
    fn level_as_str(level: Level, expected: &str) {
        assert_eq!(level.as_str(), expected);
        assert_eq!(level.to_string(), expected);
    }

    #[test]
    fn level_from_str_roundtrip() {
        for level in [Level::Debug, Level::Info, Level::Warn, Level::Error] {
            let parsed: Result<Level, _> = level.as_str().parse();
            assert_eq!(parsed.ok(), Some(level));
        }
    }

    #[test]
    fn level_from_str_rejects_unknown() {
        let parsed: Result<Level, _> = "VERBOSE".parse();
        assert!(parsed.is_err());

        let parsed: Result<Level, _> = "info".parse();
        assert!(parsed.is_err(), "level names are case-sensitive");
    }

    #[test]
    fn level_serialization() {
        let json = serde_json::to_string(&Level::Warn).map_err(|e| format!("serialize: {e}"));
        assert_eq!(json, Ok("\"WARN\"".to_string()));

        let parsed: Result<Level, _> =
            serde_json::from_str("\"ERROR\"").map_err(|e| format!("deserialize: {e}"));
        assert_eq!(parsed, Ok(Level::Error));
    }

    #[test]
    fn entry_construction() {
        let entry = LogEntry::new(Level::Info, "hello");
        assert_eq!(entry.level, Level::Info);
        assert_eq!(entry.message, "hello");
    }

    #[test]
    fn entry_serialization_roundtrip() {
        let entry = LogEntry::new(Level::Error, "boom\t{\"k\": 1}");
        let json = serde_json::to_string(&entry).expect("serialize");
        let parsed: LogEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, entry);
    }
}
