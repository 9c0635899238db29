//! web_search tool implementation.
//!
//! Searches through the gateway: cached responses first, Tavily on a miss,
//! cached or empty results when Tavily fails.

use super::json_result;
use marksearch_client::SearchGateway;
use marksearch_core::Error;
use marksearch_core::cache::history::DEFAULT_SEARCH_TYPE;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search query (required).
    pub query: String,

    /// Search type: "news" searches news, anything else is a general search (default "general").
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Implementation of the web_search tool.
pub async fn search_impl(gateway: &SearchGateway, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let search_type = match params.search_type.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => DEFAULT_SEARCH_TYPE,
    };

    tracing::info!(query, search_type, "received search request");
    let response = gateway.search(query, search_type).await;
    tracing::info!(query, results = response.result_count, from_cache = response.from_cache, "search completed");

    json_result(&response)
}
