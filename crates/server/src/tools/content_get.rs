//! content_get tool implementation.
//!
//! Returns the readable text of a page, from the content cache when fresh.

use super::json_result;
use marksearch_client::ContentService;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for content_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ContentGetParams {
    /// The URL to read.
    pub url: String,

    /// Refetch even if a fresh cached copy exists.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Implementation of the content_get tool.
pub async fn content_impl(content: &ContentService, params: ContentGetParams) -> Result<CallToolResult, McpError> {
    let response = content.get_content(&params.url, params.force_refresh).await?;
    json_result(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support;
    use marksearch_client::ContentResponse;

    #[tokio::test]
    async fn test_content_get_caches() {
        let state = test_support::state().await;
        let params = ContentGetParams { url: "example.com/page".into(), force_refresh: false };

        let first: ContentResponse = test_support::output(&content_impl(&state.content, params.clone()).await.unwrap());
        assert!(!first.cached);
        assert_eq!(first.title, "Example");
        assert_eq!(first.content, "Hello there");
        assert_eq!(first.word_count, 2);

        let second: ContentResponse = test_support::output(&content_impl(&state.content, params).await.unwrap());
        assert!(second.cached);
    }

    #[tokio::test]
    async fn test_content_get_invalid_url() {
        let state = test_support::state().await;
        let params = ContentGetParams { url: "".into(), force_refresh: false };

        let err = content_impl(&state.content, params).await.unwrap_err();
        assert_eq!(err.code.0, -32003);
    }
}
