//! Saved item tools: saved_list, saved_add, saved_update_notes, saved_delete, saved_check.

use super::json_result;
use marksearch_core::{CacheDb, SavedItem};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SavedAddParams {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SavedUpdateNotesParams {
    pub id: i64,
    /// New notes; omit or null to clear them.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SavedIdParams {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SavedCheckParams {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedListOutput {
    pub items: Vec<SavedItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDeleteOutput {
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCheckOutput {
    pub saved: bool,
}

pub async fn list_impl(db: &CacheDb) -> Result<CallToolResult, McpError> {
    let items = db.list_saved_items().await?;
    json_result(&SavedListOutput { items })
}

pub async fn add_impl(db: &CacheDb, params: SavedAddParams) -> Result<CallToolResult, McpError> {
    let item = db
        .save_item(&params.title, &params.url, params.summary.as_deref())
        .await?;
    json_result(&item)
}

pub async fn update_notes_impl(db: &CacheDb, params: SavedUpdateNotesParams) -> Result<CallToolResult, McpError> {
    let item = db.update_saved_notes(params.id, params.notes.as_deref()).await?;
    json_result(&item)
}

pub async fn delete_impl(db: &CacheDb, params: SavedIdParams) -> Result<CallToolResult, McpError> {
    db.delete_saved_item(params.id).await?;
    json_result(&SavedDeleteOutput { deleted: true })
}

pub async fn check_impl(db: &CacheDb, params: SavedCheckParams) -> Result<CallToolResult, McpError> {
    let saved = db.saved_url_exists(&params.url).await?;
    json_result(&SavedCheckOutput { saved })
}
