//! Configuration module
//!
//! Handles CLI configuration including server URL and API key.

use std::time::Duration;

use anyhow::{Context, Result};
use smc_client::SmcClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the SMC server
    pub server_url: String,
    /// Shared secret sent as `x-api-key`
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl Config {
    /// Builds an API client from this configuration
    pub fn client(&self) -> Result<SmcClient> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(SmcClient::with_client(
            &self.server_url,
            &self.api_key,
            http,
        ))
    }
}
