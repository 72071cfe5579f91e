//! Server configuration
//!
//! Loaded from a TOML file that is created with defaults on first start.
//! Environment variables override individual values after the file is read.
//!
//! ```toml
//! [http]
//! enabled = true
//! host = "127.0.0.1"
//! port = 8080
//! api-key = "..."
//!
//! [logging]
//! buffer-size = 10000
//! retention-hours = 24
//! sweep-interval-seconds = 300
//!
//! [commands]
//! timeout-seconds = 30
//! blacklist = ["stop", "restart"]
//!
//! [host]
//! version = "1.20.4-R0.1-SNAPSHOT"
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Used when `SMC_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "smc.toml";

/// Keys shipped in sample configs; replaced by a generated key on load
const PLACEHOLDER_KEYS: [&str; 3] = [
    "change-this-to-a-secure-random-key",
    "change-me-to-a-secure-key",
    "your-secure-api-key-here",
];

const MIN_BUFFER_SIZE: usize = 100;
const LARGE_BUFFER_SIZE: usize = 100_000;
const LONG_TIMEOUT_SECONDS: u64 = 300;
const MIN_KEY_LENGTH: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub commands: CommandsConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Serve the HTTP API at all
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Shared secret expected in the `x-api-key` header
    pub api_key: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_key: PLACEHOLDER_KEYS[0].to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Maximum number of entries kept in memory
    pub buffer_size: usize,
    pub retention_hours: u64,
    pub sweep_interval_seconds: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            buffer_size: 10_000,
            retention_hours: 24,
            sweep_interval_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CommandsConfig {
    pub timeout_seconds: u64,
    /// Base commands that are never executed remotely
    pub blacklist: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            blacklist: vec!["stop".to_string(), "restart".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HostConfig {
    /// Version string reported by the built-in console host
    pub version: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            version: "1.20.4-R0.1-SNAPSHOT".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path` with process environment overrides
    ///
    /// Expected environment variables (all optional):
    /// - SMC_HTTP_HOST
    /// - SMC_HTTP_PORT
    /// - SMC_API_KEY
    /// - SMC_LOG_BUFFER_SIZE
    /// - SMC_LOG_RETENTION_HOURS (hours)
    /// - SMC_COMMAND_TIMEOUT (seconds)
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup
    ///
    /// # Steps
    /// 1. Read `path`, or write the defaults there if it does not exist
    /// 2. Replace a placeholder API key with a generated one and save it
    /// 3. Apply environment overrides (never written back)
    /// 4. Validate
    pub fn load_with_env<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            info!("Creating default config at {}", path.display());
            let config = Config::default();
            config.save(path)?;
            config
        };

        if config.ensure_api_key() {
            config.save(path)?;
            warn!(
                "Generated new API key: {} (saved to {})",
                config.http.api_key,
                path.display()
            );
        }

        config.apply_env(env)?;
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration to `path` as TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Replaces an empty or placeholder API key with a random one
    ///
    /// # Returns
    /// `true` if the key was replaced
    pub fn ensure_api_key(&mut self) -> bool {
        if !self.http.api_key.is_empty() && !is_placeholder_key(&self.http.api_key) {
            return false;
        }
        self.http.api_key = Uuid::new_v4().simple().to_string();
        true
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("SMC_HTTP_HOST") {
            self.http.host = host;
        }
        if let Some(port) = parse_env(&env, "SMC_HTTP_PORT")? {
            self.http.port = port;
        }
        if let Some(key) = env("SMC_API_KEY") {
            self.http.api_key = key;
        }
        if let Some(size) = parse_env(&env, "SMC_LOG_BUFFER_SIZE")? {
            self.logging.buffer_size = size;
        }
        if let Some(hours) = parse_env(&env, "SMC_LOG_RETENTION_HOURS")? {
            self.logging.retention_hours = hours;
        }
        if let Some(seconds) = parse_env(&env, "SMC_COMMAND_TIMEOUT")? {
            self.commands.timeout_seconds = seconds;
        }
        Ok(())
    }

    /// Fails on values the server cannot run with; warns on questionable ones
    pub fn validate(&self) -> Result<()> {
        if self.http.port == 0 {
            bail!("http.port must be between 1 and 65535");
        }
        if self.http.host.trim().is_empty() {
            bail!("http.host cannot be empty");
        }
        if self.http.api_key.is_empty() {
            bail!("http.api-key cannot be empty");
        }
        if self.logging.buffer_size < MIN_BUFFER_SIZE {
            bail!("logging.buffer-size must be at least {}", MIN_BUFFER_SIZE);
        }
        if self.logging.retention_hours < 1 {
            bail!("logging.retention-hours must be at least 1");
        }
        if self.logging.sweep_interval_seconds < 1 {
            bail!("logging.sweep-interval-seconds must be at least 1");
        }
        if self.commands.timeout_seconds < 1 {
            bail!("commands.timeout-seconds must be at least 1");
        }

        if self.http.api_key.len() < MIN_KEY_LENGTH {
            warn!(
                "API key is shorter than {} characters, consider a longer one",
                MIN_KEY_LENGTH
            );
        }
        if self.logging.buffer_size > LARGE_BUFFER_SIZE {
            warn!(
                "Log buffer size {} is very large and may use a lot of memory",
                self.logging.buffer_size
            );
        }
        if self.commands.timeout_seconds > LONG_TIMEOUT_SECONDS {
            warn!(
                "Command timeout of {}s is very long",
                self.commands.timeout_seconds
            );
        }

        Ok(())
    }

    /// Address the HTTP listener binds to (e.g. "127.0.0.1:8080")
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.commands.timeout_seconds)
    }

    pub fn log_retention(&self) -> Duration {
        Duration::from_secs(self.logging.retention_hours.saturating_mul(3600))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.logging.sweep_interval_seconds)
    }
}

/// True for the sample keys that must never be used as real secrets
pub fn is_placeholder_key(key: &str) -> bool {
    PLACEHOLDER_KEYS.contains(&key)
}

fn parse_env<F, T>(env: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", name, raw))
        })
        .transpose()
}
