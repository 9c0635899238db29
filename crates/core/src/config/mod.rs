//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from, highest precedence first:
//!
//! 1. Environment variables (MARKSEARCH_*)
//! 2. TOML config file (if MARKSEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "MARKSEARCH_";

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "MARKSEARCH_CONFIG_FILE";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tavily API key for web_search.
    ///
    /// Set via MARKSEARCH_TAVILY_API_KEY. Without it every search is served
    /// from the cache or comes back empty.
    #[serde(default)]
    pub tavily_api_key: Option<String>,

    /// Base URL of the Tavily API.
    #[serde(default = "default_tavily_base_url")]
    pub tavily_base_url: String,

    /// Upstream search timeout in milliseconds.
    #[serde(default = "default_tavily_timeout_ms")]
    pub tavily_timeout_ms: u64,

    /// How long a cached search response may be served.
    #[serde(default = "default_search_cache_ttl_minutes")]
    pub search_cache_ttl_minutes: u64,

    /// Interval between background cache sweeps in milliseconds.
    #[serde(default = "default_eviction_interval_ms")]
    pub eviction_interval_ms: u64,

    /// Age after which cached page content is refetched.
    #[serde(default = "default_content_cache_ttl_hours")]
    pub content_cache_ttl_hours: u64,

    /// Window in which identical history records collapse into one.
    #[serde(default = "default_history_dedupe_secs")]
    pub history_dedupe_secs: u64,

    /// Path to the SQLite database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for page fetches.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read per page fetch.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Page fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_tavily_base_url() -> String {
    "https://api.tavily.com".into()
}

fn default_tavily_timeout_ms() -> u64 {
    30_000
}

fn default_search_cache_ttl_minutes() -> u64 {
    60
}

fn default_eviction_interval_ms() -> u64 {
    3_600_000
}

fn default_content_cache_ttl_hours() -> u64 {
    24
}

fn default_history_dedupe_secs() -> u64 {
    30
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./marksearch.sqlite")
}

fn default_user_agent() -> String {
    "marksearch/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_fetch_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            tavily_base_url: default_tavily_base_url(),
            tavily_timeout_ms: default_tavily_timeout_ms(),
            search_cache_ttl_minutes: default_search_cache_ttl_minutes(),
            eviction_interval_ms: default_eviction_interval_ms(),
            content_cache_ttl_hours: default_content_cache_ttl_hours(),
            history_dedupe_secs: default_history_dedupe_secs(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

fn time_delta(value: u64, build: fn(i64) -> Option<chrono::Duration>) -> chrono::Duration {
    i64::try_from(value)
        .ok()
        .and_then(build)
        .unwrap_or(chrono::Duration::MAX)
}

impl AppConfig {
    /// Upstream search timeout.
    pub fn tavily_timeout(&self) -> Duration {
        Duration::from_millis(self.tavily_timeout_ms)
    }

    /// Page fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Background sweep period.
    pub fn eviction_interval(&self) -> Duration {
        Duration::from_millis(self.eviction_interval_ms)
    }

    /// Search cache TTL. Values too large for a `TimeDelta` saturate.
    pub fn search_cache_ttl(&self) -> chrono::Duration {
        time_delta(self.search_cache_ttl_minutes, chrono::Duration::try_minutes)
    }

    pub fn content_cache_ttl(&self) -> chrono::Duration {
        time_delta(self.content_cache_ttl_hours, chrono::Duration::try_hours)
    }

    pub fn history_dedupe_window(&self) -> chrono::Duration {
        time_delta(self.history_dedupe_secs, chrono::Duration::try_seconds)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var(CONFIG_FILE_ENV) {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// The Tavily API key, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is unset or blank.
    pub fn require_tavily_api_key(&self) -> Result<&str, ConfigError> {
        self.tavily_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "tavily_api_key".into(),
                hint: "Set MARKSEARCH_TAVILY_API_KEY environment variable".into(),
            })
    }
}
