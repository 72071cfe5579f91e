//! Log domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Level names as the server's log capture emits them.
///
/// The level set is open: producers may emit any string, these are only the
/// spellings the query helpers know about.
pub mod level {
    pub const TRACE: &str = "TRACE";
    pub const DEBUG: &str = "DEBUG";
    pub const INFO: &str = "INFO";
    pub const WARN: &str = "WARN";
    pub const WARNING: &str = "WARNING";
    pub const ERROR: &str = "ERROR";
}

/// A single captured log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Capture time, epoch milliseconds on the wire
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub level: String,
    /// Logger or plugin the record came from
    pub source: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: impl Into<String>,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level: level.into(),
            source: source.into(),
            message: message.into(),
        }
    }

    /// Case-insensitive level comparison
    pub fn has_level(&self, level: &str) -> bool {
        self.level.eq_ignore_ascii_case(level)
    }

    /// True for both warning spellings (`WARN` and `WARNING`)
    pub fn is_warning(&self) -> bool {
        self.has_level(level::WARN) || self.has_level(level::WARNING)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] [{}] [{}] {}",
            self.timestamp.timestamp_millis(),
            self.level,
            self.source,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_has_level_ignores_case() {
        let entry = LogEntry::new(Utc::now(), "error", "Server", "boom");
        assert!(entry.has_level("ERROR"));
        assert!(entry.has_level("Error"));
        assert!(!entry.has_level("WARN"));
    }

    #[test]
    fn test_is_warning_accepts_both_spellings() {
        assert!(LogEntry::new(Utc::now(), "WARN", "a", "m").is_warning());
        assert!(LogEntry::new(Utc::now(), "warning", "a", "m").is_warning());
        assert!(!LogEntry::new(Utc::now(), "ERROR", "a", "m").is_warning());
        assert!(!LogEntry::new(Utc::now(), "INFO", "a", "m").is_warning());
    }

    #[test]
    fn test_timestamp_serializes_as_millis() {
        let timestamp = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let entry = LogEntry::new(timestamp, "INFO", "Server", "Done (3.2s)!");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_123_i64);
        assert_eq!(json["source"], "Server");

        let back: LogEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
