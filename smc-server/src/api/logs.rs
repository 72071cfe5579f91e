//! Log API Handlers
//!
//! Read-only queries against the in-memory log store. Results are newest
//! first.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, Utc};
use smc_core::dto::log::{
    DEFAULT_LIMIT, ErrorsResponse, FilteredLogsQuery, LogsQuery, LogsResponse, WarningsResponse,
};

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// GET /api/logs
/// Recent log entries, optionally bounded by `start_time`/`end_time` (epoch ms)
pub async fn get_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> ApiResult<Json<LogsResponse>> {
    let Query(query) = query.map_err(bad_query)?;
    let start = to_time(query.start_time, "start_time")?;
    let end = to_time(query.end_time, "end_time")?;

    let logs = state.logs.query(to_limit(query.limit), start, end);

    Ok(Json(LogsResponse { logs }))
}

/// GET /api/logs/errors
/// Recent ERROR entries, optionally filtered by source (`plugin`)
pub async fn get_errors(
    State(state): State<AppState>,
    query: Result<Query<FilteredLogsQuery>, QueryRejection>,
) -> ApiResult<Json<ErrorsResponse>> {
    let Query(query) = query.map_err(bad_query)?;

    let errors = state
        .logs
        .query_errors(source_filter(&query), to_limit(query.limit));

    Ok(Json(ErrorsResponse { errors }))
}

/// GET /api/logs/warnings
/// Recent WARN/WARNING entries, optionally filtered by source (`plugin`)
pub async fn get_warnings(
    State(state): State<AppState>,
    query: Result<Query<FilteredLogsQuery>, QueryRejection>,
) -> ApiResult<Json<WarningsResponse>> {
    let Query(query) = query.map_err(bad_query)?;

    let warnings = state
        .logs
        .query_warnings(source_filter(&query), to_limit(query.limit));

    Ok(Json(WarningsResponse { warnings }))
}

fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Negative limits select nothing
fn to_limit(limit: Option<i64>) -> usize {
    usize::try_from(limit.unwrap_or(DEFAULT_LIMIT)).unwrap_or(0)
}

fn to_time(millis: Option<i64>, name: &str) -> ApiResult<Option<DateTime<Utc>>> {
    millis
        .map(|ms| {
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid {}: {}", name, ms)))
        })
        .transpose()
}

fn source_filter(query: &FilteredLogsQuery) -> Option<&str> {
    query.plugin.as_deref().filter(|plugin| !plugin.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::TestApp;

    fn logs_query(limit: Option<i64>, start: Option<i64>, end: Option<i64>) -> LogsQuery {
        LogsQuery {
            limit,
            start_time: start,
            end_time: end,
        }
    }

    fn filtered(plugin: Option<&str>, limit: Option<i64>) -> FilteredLogsQuery {
        FilteredLogsQuery {
            plugin: plugin.map(str::to_string),
            limit,
        }
    }

    #[tokio::test]
    async fn test_default_limit() {
        let app = TestApp::new();
        for i in 0..150 {
            app.state.logs.ingest("INFO", "Server", format!("line {}", i));
        }

        let Json(response) = get_logs(State(app.state.clone()), Ok(Query(LogsQuery::default())))
            .await
            .unwrap();

        assert_eq!(response.logs.len(), 100);
        assert_eq!(response.logs[0].message, "line 149");
    }

    #[tokio::test]
    async fn test_negative_limit_returns_nothing() {
        let app = TestApp::new();
        app.state.logs.ingest("INFO", "Server", "hello");

        let Json(response) = get_logs(
            State(app.state.clone()),
            Ok(Query(logs_query(Some(-5), None, None))),
        )
        .await
        .unwrap();

        assert!(response.logs.is_empty());
    }

    #[tokio::test]
    async fn test_time_range_inclusive() {
        let app = TestApp::new();
        app.state.logs.ingest("INFO", "Server", "hello");
        let ts = app.state.logs.query(1, None, None)[0].timestamp.timestamp_millis();

        let Json(hit) = get_logs(
            State(app.state.clone()),
            Ok(Query(logs_query(None, Some(ts), Some(ts)))),
        )
        .await
        .unwrap();
        assert_eq!(hit.logs.len(), 1);

        let Json(miss) = get_logs(
            State(app.state.clone()),
            Ok(Query(logs_query(None, Some(ts + 1), None))),
        )
        .await
        .unwrap();
        assert!(miss.logs.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_time_is_bad_request() {
        let app = TestApp::new();

        let err = get_logs(
            State(app.state.clone()),
            Ok(Query(logs_query(None, Some(i64::MAX), None))),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::BadRequest(msg) if msg.contains("start_time")));
    }

    #[tokio::test]
    async fn test_errors_filtered_by_plugin() {
        let app = TestApp::new();
        app.state.logs.ingest("ERROR", "WorldEdit", "bad selection");
        app.state.logs.ingest("ERROR", "Essentials", "no kit");
        app.state.logs.ingest("INFO", "WorldEdit", "ok");

        let Json(all) = get_errors(State(app.state.clone()), Ok(Query(filtered(None, None))))
            .await
            .unwrap();
        assert_eq!(all.errors.len(), 2);

        let Json(some) = get_errors(
            State(app.state.clone()),
            Ok(Query(filtered(Some("World"), None))),
        )
        .await
        .unwrap();
        assert_eq!(some.errors.len(), 1);
        assert_eq!(some.errors[0].message, "bad selection");

        // An empty plugin parameter means no filter
        let Json(empty) = get_errors(State(app.state.clone()), Ok(Query(filtered(Some(""), None))))
            .await
            .unwrap();
        assert_eq!(empty.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_warnings_include_both_spellings() {
        let app = TestApp::new();
        app.state.logs.ingest("WARN", "Server", "a");
        app.state.logs.ingest("WARNING", "Server", "b");
        app.state.logs.ingest("ERROR", "Server", "c");

        let Json(response) = get_warnings(
            State(app.state.clone()),
            Ok(Query(filtered(None, Some(10)))),
        )
        .await
        .unwrap();

        let messages: Vec<&str> = response.warnings.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "a"]);
    }
}
