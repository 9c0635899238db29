//! Preference tools: preferences_get, preferences_update.

use super::json_result;
use marksearch_core::{CacheDb, PreferenceUpdate};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for preferences_update; omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PreferencesUpdateParams {
    #[serde(default)]
    pub default_query: Option<String>,
    #[serde(default)]
    pub default_type: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub show_advanced_tips: Option<bool>,
}

impl From<PreferencesUpdateParams> for PreferenceUpdate {
    fn from(params: PreferencesUpdateParams) -> Self {
        PreferenceUpdate {
            default_query: params.default_query,
            default_type: params.default_type,
            theme: params.theme,
            show_advanced_tips: params.show_advanced_tips,
        }
    }
}

pub async fn get_impl(db: &CacheDb) -> Result<CallToolResult, McpError> {
    let prefs = db.latest_preferences().await?;
    json_result(&prefs)
}

pub async fn update_impl(db: &CacheDb, params: PreferencesUpdateParams) -> Result<CallToolResult, McpError> {
    let prefs = db.update_preferences(params.into()).await?;
    json_result(&prefs)
}
