//! Tavily Search API client.
//!
//! ### API
//!
//! - **Endpoint**: `POST {base_url}/search` (default base `https://api.tavily.com`)
//! - **Authentication**: API key sent as `api_key` in the JSON body.
//! - **Request**: basic depth, no answer/images/raw content, at most 10 results;
//!   the `news` search type selects the news topic, anything else is general.
//! - **Timeout**: bounded by the client (default 30s).
//! - **Normalization**: the gateway parses the body with [`parse_search_body`].

pub mod error;
pub mod request;
pub mod response;

pub use error::TavilyError;
pub use request::SearchRequest;
pub use response::parse_search_body;

use crate::gateway::SearchUpstream;
use async_trait::async_trait;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the Tavily API.
pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tavily client configuration.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    /// API key; searches fail with [`TavilyError::MissingApiKey`] without one.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string(), timeout: DEFAULT_TIMEOUT }
    }
}

impl TavilyConfig {
    /// Build from the application configuration.
    pub fn from_app_config(config: &marksearch_core::AppConfig) -> Self {
        Self {
            api_key: config.require_tavily_api_key().ok().map(str::to_string),
            base_url: config.tavily_base_url.clone(),
            timeout: config.tavily_timeout(),
        }
    }
}

/// Tavily Search API client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    http: reqwest::Client,
    config: TavilyConfig,
}

impl TavilyClient {
    /// Create a new Tavily client with the given configuration.
    pub fn new(config: TavilyConfig) -> Result<Self, TavilyError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TavilyError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }

    /// Run a search and return the raw response body.
    pub async fn search_raw(&self, query: &str, search_type: &str) -> Result<String, TavilyError> {
        let api_key = self.config.api_key.as_deref().ok_or(TavilyError::MissingApiKey)?;
        let req = SearchRequest::new(api_key, query, search_type);

        let start = Instant::now();
        tracing::debug!(query, topic = req.topic, "searching Tavily API");

        let http_response = self
            .http
            .post(self.search_url())
            .header(header::ACCEPT, "application/json")
            .json(&req)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, "Tavily API response status");

        if status.is_client_error() || status.is_server_error() {
            return Err(TavilyError::HttpError { status: status.as_u16() });
        }

        let body = http_response.text().await?;
        tracing::debug!(elapsed = ?start.elapsed(), bytes = body.len(), "Tavily search completed");

        Ok(body)
    }
}

#[async_trait]
impl SearchUpstream for TavilyClient {
    async fn search(&self, query: &str, search_type: &str) -> Result<String, TavilyError> {
        self.search_raw(query, search_type).await
    }
}
