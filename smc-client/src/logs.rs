//! Log query endpoints

use crate::SmcClient;
use crate::error::Result;
use smc_core::domain::log::LogEntry;
use smc_core::dto::log::{
    ErrorsResponse, FilteredLogsQuery, LogsQuery, LogsResponse, WarningsResponse,
};

impl SmcClient {
    /// Recent log entries, newest first
    ///
    /// # Arguments
    /// * `query` - Limit and optional time range (epoch milliseconds)
    pub async fn logs(&self, query: &LogsQuery) -> Result<Vec<LogEntry>> {
        let response = self.get("/api/logs").query(query).send().await?;

        let body: LogsResponse = self.handle_response(response).await?;
        Ok(body.logs)
    }

    /// Recent ERROR entries, optionally only from sources containing `plugin`
    pub async fn errors(&self, plugin: Option<&str>, limit: Option<i64>) -> Result<Vec<LogEntry>> {
        let response = self
            .get("/api/logs/errors")
            .query(&filtered(plugin, limit))
            .send()
            .await?;

        let body: ErrorsResponse = self.handle_response(response).await?;
        Ok(body.errors)
    }

    /// Recent WARN/WARNING entries, optionally only from sources containing `plugin`
    pub async fn warnings(
        &self,
        plugin: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<LogEntry>> {
        let response = self
            .get("/api/logs/warnings")
            .query(&filtered(plugin, limit))
            .send()
            .await?;

        let body: WarningsResponse = self.handle_response(response).await?;
        Ok(body.warnings)
    }
}

fn filtered(plugin: Option<&str>, limit: Option<i64>) -> FilteredLogsQuery {
    FilteredLogsQuery {
        plugin: plugin.map(str::to_string),
        limit,
    }
}
