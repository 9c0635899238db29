//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::state::AppState;
use crate::tools::cache::{CachePurgeParams, purge_impl};
use crate::tools::content_get::{ContentGetParams, content_impl};
use crate::tools::history::{self, HistoryListParams, HistoryRecordParams};
use crate::tools::preferences::{self, PreferencesUpdateParams};
use crate::tools::saved::{self, SavedAddParams, SavedCheckParams, SavedIdParams, SavedUpdateNotesParams};
use crate::tools::search_status::status_impl;
use crate::tools::web_search::{WebSearchParams, search_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for marksearch.
#[derive(Clone)]
pub struct MarksearchServer {
    state: AppState,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl MarksearchServer {
    /// Create a new server handler over shared state.
    pub fn new(state: AppState) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    /// Search the web.
    ///
    /// Never fails on upstream errors: a cached response or an empty result list is returned instead.
    #[tool(
        description = "Search the web via Tavily. search_type \"news\" searches news, anything else is general. Results are cached; when the search API fails, cached or empty results are returned."
    )]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.state.gateway, params.0).await
    }

    #[tool(description = "Report search health: whether the last upstream call succeeded, when the last success was, and how many responses are cached.")]
    async fn search_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.state.gateway).await
    }

    #[tool(description = "Get the readable text of a web page. Cached for 24 hours by default; set force_refresh to refetch.")]
    async fn content_get(&self, params: Parameters<ContentGetParams>) -> Result<CallToolResult, McpError> {
        content_impl(&self.state.content, params.0).await
    }

    #[tool(description = "Purge cache entries: expired search responses and page content, page content for a domain, or all but the newest max_entries pages.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.state.gateway, &self.state.content, params.0).await
    }

    #[tool(description = "List recent searches, newest first.")]
    async fn history_list(&self, params: Parameters<HistoryListParams>) -> Result<CallToolResult, McpError> {
        history::list_impl(&self.state.db, params.0).await
    }

    #[tool(description = "Record a search in history. Repeats of the same query and type within a short window are collapsed.")]
    async fn history_record(&self, params: Parameters<HistoryRecordParams>) -> Result<CallToolResult, McpError> {
        history::record_impl(&self.state.db, self.state.config.history_dedupe_window(), params.0).await
    }

    #[tool(description = "Delete all search history.")]
    async fn history_clear(&self) -> Result<CallToolResult, McpError> {
        history::clear_impl(&self.state.db).await
    }

    #[tool(description = "List saved items, newest first.")]
    async fn saved_list(&self) -> Result<CallToolResult, McpError> {
        saved::list_impl(&self.state.db).await
    }

    #[tool(description = "Save a search result. Fails if the URL is already saved.")]
    async fn saved_add(&self, params: Parameters<SavedAddParams>) -> Result<CallToolResult, McpError> {
        saved::add_impl(&self.state.db, params.0).await
    }

    #[tool(description = "Replace the notes on a saved item.")]
    async fn saved_update_notes(&self, params: Parameters<SavedUpdateNotesParams>) -> Result<CallToolResult, McpError> {
        saved::update_notes_impl(&self.state.db, params.0).await
    }

    #[tool(description = "Delete a saved item by id.")]
    async fn saved_delete(&self, params: Parameters<SavedIdParams>) -> Result<CallToolResult, McpError> {
        saved::delete_impl(&self.state.db, params.0).await
    }

    #[tool(description = "Check whether a URL has been saved.")]
    async fn saved_check(&self, params: Parameters<SavedCheckParams>) -> Result<CallToolResult, McpError> {
        saved::check_impl(&self.state.db, params.0).await
    }

    #[tool(description = "Get user preferences. Defaults are returned if none have been stored.")]
    async fn preferences_get(&self) -> Result<CallToolResult, McpError> {
        preferences::get_impl(&self.state.db).await
    }

    #[tool(description = "Update user preferences. Omitted fields keep their current value.")]
    async fn preferences_update(&self, params: Parameters<PreferencesUpdateParams>) -> Result<CallToolResult, McpError> {
        preferences::update_impl(&self.state.db, params.0).await
    }
}

impl ServerHandler for MarksearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "marksearch".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
