//! Rate Limit Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default ceiling: 10 requests per second
pub const DEFAULT_MAX_REQUESTS: u32 = 10;
pub const DEFAULT_WINDOW_MS: u64 = 1000;

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    pub enabled: bool,

    /// Requests admitted per window
    pub max_requests: u32,

    /// Window length in milliseconds
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: DEFAULT_MAX_REQUESTS,
            window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

impl RateLimitConfig {
    /// Create a new rate limit configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Ceiling of `max_requests` per second
    pub fn per_second(max_requests: u32) -> Self {
        Self {
            max_requests,
            ..Self::default()
        }
    }

    /// Disable rate limiting (for testing)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Get window duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window(), Duration::from_secs(1));
    }

    #[test]
    fn test_disabled_config() {
        assert!(!RateLimitConfig::disabled().enabled);
    }

    #[test]
    fn test_per_second() {
        let config = RateLimitConfig::per_second(4);
        assert_eq!(config.max_requests, 4);
        assert_eq!(config.window_ms, 1000);
    }

    #[test]
    fn test_config_serialization() {
        let config = RateLimitConfig::per_second(3);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RateLimitConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }
}
