//! Search history tools: history_list, history_record, history_clear.

use super::json_result;
use chrono::Duration;
use marksearch_core::cache::history::DEFAULT_HISTORY_LIMIT;
use marksearch_core::{CacheDb, Error, HistoryEntry};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest page of history returned at once.
const MAX_HISTORY_LIMIT: usize = 500;

/// Parameters for the history_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryListParams {
    /// Number of entries to return, newest first (default 20).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Parameters for the history_record tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HistoryRecordParams {
    /// The query that was searched.
    pub query: String,

    /// Search type (default "general").
    #[serde(default)]
    pub search_type: Option<String>,

    /// Number of results the search produced.
    #[serde(default)]
    pub results_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryListOutput {
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryClearOutput {
    pub deleted: u64,
}

pub async fn list_impl(db: &CacheDb, params: HistoryListParams) -> Result<CallToolResult, McpError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(Error::InvalidInput(format!("limit must be between 1 and {MAX_HISTORY_LIMIT}")).into());
    }

    let entries = db.recent_history(limit).await?;
    json_result(&HistoryListOutput { entries })
}

/// Record a search; repeats inside `dedupe_window` return the earlier entry.
pub async fn record_impl(
    db: &CacheDb, dedupe_window: Duration, params: HistoryRecordParams,
) -> Result<CallToolResult, McpError> {
    let entry = db
        .record_history(&params.query, params.search_type.as_deref(), params.results_count, dedupe_window)
        .await?;
    json_result(&entry)
}

pub async fn clear_impl(db: &CacheDb) -> Result<CallToolResult, McpError> {
    let deleted = db.clear_history().await?;
    tracing::info!(deleted, "search history cleared");
    json_result(&HistoryClearOutput { deleted })
}
