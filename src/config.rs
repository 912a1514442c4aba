// Configuration Support
//
// Process configuration for the catalog tool server.
// Starts from defaults and applies environment variable overrides; read once
// at startup and passed by value into the client afterwards.

use crate::api::retry::RetryConfig;
use crate::api::transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::rate_limit::RateLimitConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Catalog API configuration
    pub api: ApiConfig,

    /// Outbound request rate limiting
    pub rate_limit: RateLimitConfig,

    /// Retry policy for transient failures
    pub retry: RetryConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Catalog API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ApiConfig {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Environment variables:
    /// - MTG_MCP_LOG_LEVEL
    /// - MTG_MCP_LOG_FORMAT
    /// - MTG_API_BASE_URL
    /// - MTG_API_TIMEOUT_SECS
    /// - MTG_API_RATE_LIMIT (requests per second)
    ///
    /// Overrides that could not be applied are returned as warnings for the
    /// caller to log once tracing is initialised.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn from_env() -> Result<(Self, Vec<String>)> {
        let (config, warnings) = Self::default().apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok((config, warnings))
    }

    /// Apply overrides from a variable lookup
    ///
    /// Numeric values that fail to parse are ignored; each one yields a
    /// warning message.
    pub fn apply_overrides<F>(mut self, lookup: F) -> (Self, Vec<String>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        // Logging overrides
        if let Some(level) = lookup("MTG_MCP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("MTG_MCP_LOG_FORMAT") {
            self.logging.format = format;
        }

        // API overrides
        if let Some(url) = lookup("MTG_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("MTG_API_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(timeout) => self.api.timeout_secs = timeout,
                Err(_) => warnings.push(format!(
                    "Ignoring MTG_API_TIMEOUT_SECS={:?}: not a number",
                    timeout
                )),
            }
        }

        // Rate limit overrides
        if let Some(rate) = lookup("MTG_API_RATE_LIMIT") {
            match rate.trim().parse::<u32>() {
                Ok(rate) => self.rate_limit.max_requests = rate,
                Err(_) => warnings.push(format!(
                    "Ignoring MTG_API_RATE_LIMIT={:?}: not a number",
                    rate
                )),
            }
        }

        (self, warnings)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            ),
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            anyhow::bail!("API base URL must not be empty");
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("API base URL must use http or https: {}", base_url);
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("API timeout must be > 0 seconds");
        }

        if self.rate_limit.max_requests == 0 {
            anyhow::bail!("Rate limit must allow at least one request per window");
        }
        if self.rate_limit.window_ms == 0 {
            anyhow::bail!("Rate limit window must be > 0 ms");
        }

        if self.retry.max_attempts == 0 {
            anyhow::bail!("Retry policy must allow at least one attempt");
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            anyhow::bail!("Retry base delay must not exceed the maximum delay");
        }

        Ok(())
    }

    /// Convert log level string to tracing::Level
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }
}
