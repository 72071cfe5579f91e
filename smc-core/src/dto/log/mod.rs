//! Log DTOs

use serde::{Deserialize, Serialize};

use crate::domain::log::LogEntry;

/// Limit applied by the log endpoints when the caller gives none
pub const DEFAULT_LIMIT: i64 = 100;

/// Query string of `GET /api/logs`
///
/// Times are epoch milliseconds, both bounds inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

/// Query string of `GET /api/logs/errors` and `GET /api/logs/warnings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilteredLogsQuery {
    /// Substring the entry source must contain
    pub plugin: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorsResponse {
    pub errors: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningsResponse {
    pub warnings: Vec<LogEntry>,
}
