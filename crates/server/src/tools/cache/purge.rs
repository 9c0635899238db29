//! cache_purge tool implementation.
//!
//! Purges expired search responses and page content, or page content by
//! domain or count.

use crate::sweeper::sweep_once;
use crate::tools::json_result;
use marksearch_client::{ContentService, SearchGateway};
use marksearch_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Remove expired search responses and stale page content now.
    #[serde(default)]
    pub expired: Option<bool>,

    /// Purge page content whose URL contains this domain.
    #[serde(default)]
    pub domain: Option<String>,

    /// Keep only the newest N page content entries.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(
    gateway: &SearchGateway, content: &ContentService, params: CachePurgeParams,
) -> Result<CallToolResult, McpError> {
    let expired = params.expired.unwrap_or(false);
    if !expired && params.domain.is_none() && params.max_entries.is_none() {
        return Err(Error::InvalidInput(
            "At least one of expired, domain, or max_entries must be specified".to_string(),
        )
        .into());
    }

    let mut deleted_total = 0u64;

    if expired {
        let report = sweep_once(gateway.cache(), content).await;
        deleted_total += report.search_entries + report.content_entries;
    }

    if let Some(domain) = params.domain.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        deleted_total += content.db().purge_content_by_domain(domain).await?;
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += content.db().purge_lru_content(max_entries).await?;
    }

    tracing::info!(deleted = deleted_total, "cache purge finished");
    json_result(&CachePurgeOutput { deleted: deleted_total })
}
