//! Runtime configuration for the insight pipeline, read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default lookback window for trends, in days
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Longest lookback window accepted from callers, in days
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Longest lifetime of a generated alert, in days
pub const MAX_ALERT_TTL_DAYS: i64 = 365;

/// Configuration for the domain services
#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    /// Lookback window used when a caller does not pass one
    pub lookback_days: u32,

    /// Upper bound on any single store fetch
    pub fetch_timeout: Duration,

    /// Maximum number of alerts returned by the alert feed
    pub alert_limit: usize,

    /// Lifetime of alerts generated from readings, in days
    pub alert_ttl_days: i64,

    /// Number of (patient, window) insight summaries kept in memory
    pub insight_cache_capacity: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            fetch_timeout: Duration::from_millis(5000),
            alert_limit: 10,
            alert_ttl_days: 7,
            insight_cache_capacity: 256,
        }
    }
}

impl PortalConfig {
    /// Read configuration from `PORTAL_*` environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let lookback_days = env_or("PORTAL_LOOKBACK_DAYS", defaults.lookback_days)
            .clamp(1, MAX_LOOKBACK_DAYS);
        let fetch_timeout_ms = env_or(
            "PORTAL_FETCH_TIMEOUT_MS",
            defaults.fetch_timeout.as_millis() as u64,
        );
        let alert_limit = env_or("PORTAL_ALERT_LIMIT", defaults.alert_limit);
        let alert_ttl_days = env_or("PORTAL_ALERT_TTL_DAYS", defaults.alert_ttl_days)
            .clamp(1, MAX_ALERT_TTL_DAYS);
        let insight_cache_capacity =
            env_or("PORTAL_INSIGHT_CACHE_CAPACITY", defaults.insight_cache_capacity).max(1);

        Self {
            lookback_days,
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            alert_limit,
            alert_ttl_days,
            insight_cache_capacity,
        }
    }

    /// Clamp a caller-supplied window, defaulting to the configured one
    pub fn resolve_lookback(&self, requested_days: Option<u32>) -> u32 {
        requested_days
            .unwrap_or(self.lookback_days)
            .clamp(1, MAX_LOOKBACK_DAYS)
    }
}

fn env_or<T: FromStr + Copy + std::fmt::Debug>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}, using default {:?}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PortalConfig::default();
        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.alert_limit, 10);
        assert_eq!(config.fetch_timeout, Duration::from_millis(5000));
    }

    #[test]
    fn test_resolve_lookback_clamps() {
        let config = PortalConfig::default();
        assert_eq!(config.resolve_lookback(None), 30);
        assert_eq!(config.resolve_lookback(Some(0)), 1);
        assert_eq!(config.resolve_lookback(Some(7)), 7);
        assert_eq!(config.resolve_lookback(Some(10_000)), MAX_LOOKBACK_DAYS);
    }

    // One test owns PORTAL_ALERT_TTL_DAYS so parallel tests never race on it
    #[test]
    fn test_from_env_alert_ttl() {
        env::set_var("PORTAL_ALERT_TTL_DAYS", "not-a-number");
        assert_eq!(PortalConfig::from_env().alert_ttl_days, 7);

        env::set_var("PORTAL_ALERT_TTL_DAYS", "1000000000");
        assert_eq!(PortalConfig::from_env().alert_ttl_days, MAX_ALERT_TTL_DAYS);

        env::set_var("PORTAL_ALERT_TTL_DAYS", "-3");
        assert_eq!(PortalConfig::from_env().alert_ttl_days, 1);

        env::remove_var("PORTAL_ALERT_TTL_DAYS");
    }
}
