//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;
const MAX_BYTES_LIMIT: usize = 50 * 1024 * 1024;
const MAX_SEARCH_CACHE_TTL_MINUTES: u64 = 366 * 24 * 60;
const MAX_CONTENT_CACHE_TTL_HOURS: u64 = 366 * 24;
const MAX_HISTORY_DEDUPE_SECS: u64 = 24 * 60 * 60;
const MAX_EVICTION_INTERVAL_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < MIN_TIMEOUT_MS {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if value > MAX_TIMEOUT_MS {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

fn check_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid { field: field.into(), reason: format!("must be between {min} and {max}") });
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - either timeout is less than 100ms or exceeds 5 minutes
    /// - a TTL is 0 or over a year, the dedupe window is 0 or over a day,
    ///   or the eviction interval is under 1s or over a week
    /// - `tavily_base_url` is not an http(s) URL
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > MAX_BYTES_LIMIT {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        check_timeout("tavily_timeout_ms", self.tavily_timeout_ms)?;
        check_timeout("fetch_timeout_ms", self.fetch_timeout_ms)?;

        check_range("search_cache_ttl_minutes", self.search_cache_ttl_minutes, 1, MAX_SEARCH_CACHE_TTL_MINUTES)?;
        check_range("content_cache_ttl_hours", self.content_cache_ttl_hours, 1, MAX_CONTENT_CACHE_TTL_HOURS)?;
        check_range("history_dedupe_secs", self.history_dedupe_secs, 1, MAX_HISTORY_DEDUPE_SECS)?;
        check_range("eviction_interval_ms", self.eviction_interval_ms, 1_000, MAX_EVICTION_INTERVAL_MS)?;

        if !(self.tavily_base_url.starts_with("http://") || self.tavily_base_url.starts_with("https://")) {
            return Err(invalid("tavily_base_url", "must start with http:// or https://"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.tavily_api_key.is_none() {
            tracing::warn!("tavily_api_key is not set; searches will only be served from cache");
        }

        Ok(())
    }
}
