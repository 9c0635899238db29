//! search_status tool implementation.

use super::json_result;
use chrono::{DateTime, Utc};
use marksearch_client::SearchGateway;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde::{Deserialize, Serialize};

pub const HEALTHY_MESSAGE: &str = "Search service is operational";
pub const UNHEALTHY_MESSAGE: &str = "Search service is experiencing issues";

/// Output structure for search_status tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStatusOutput {
    /// Whether the last upstream call succeeded.
    pub healthy: bool,
    /// Stored search responses, including expired ones not yet swept.
    pub cached_entry_count: u64,
    /// Time of the last successful upstream call.
    pub last_successful_call: Option<DateTime<Utc>>,
    pub message: String,
}

/// Implementation of the search_status tool.
pub async fn status_impl(gateway: &SearchGateway) -> Result<CallToolResult, McpError> {
    let healthy = gateway.is_healthy();
    let output = SearchStatusOutput {
        healthy,
        cached_entry_count: gateway.cache().cache_entry_count().await,
        last_successful_call: gateway.last_successful_call_time(),
        message: if healthy { HEALTHY_MESSAGE } else { UNHEALTHY_MESSAGE }.to_string(),
    };
    tracing::debug!(healthy, cached_entries = output.cached_entry_count, "returning search status");

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{self, StaticUpstream};
    use marksearch_client::TavilyError;

    #[tokio::test]
    async fn test_initial_status() {
        let state = test_support::state().await;
        let output: SearchStatusOutput = test_support::output(&status_impl(&state.gateway).await.unwrap());

        assert!(output.healthy);
        assert_eq!(output.cached_entry_count, 0);
        assert!(output.last_successful_call.is_none());
        assert_eq!(output.message, HEALTHY_MESSAGE);
    }

    #[tokio::test]
    async fn test_status_after_success() {
        let state = test_support::state().await;
        state.gateway.search("rust", "general").await;

        let output: SearchStatusOutput = test_support::output(&status_impl(&state.gateway).await.unwrap());
        assert!(output.healthy);
        assert_eq!(output.cached_entry_count, 1);
        assert!(output.last_successful_call.is_some());
    }

    #[tokio::test]
    async fn test_status_after_failure() {
        let state = test_support::state_with(StaticUpstream(Err(TavilyError::HttpError { status: 500 }))).await;
        state.gateway.search("rust", "general").await;

        let output: SearchStatusOutput = test_support::output(&status_impl(&state.gateway).await.unwrap());
        assert!(!output.healthy);
        assert_eq!(output.message, UNHEALTHY_MESSAGE);
    }
}
