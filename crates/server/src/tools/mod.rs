//! MCP tool implementations.
//!
//! Each tool takes its parameters and the shared services it needs, and
//! returns pretty-printed JSON as a single text content block.

pub mod cache;
pub mod content_get;
pub mod history;
pub mod preferences;
pub mod saved;
pub mod search_status;
pub mod web_search;

use marksearch_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Serialize `output` as the tool's text result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
