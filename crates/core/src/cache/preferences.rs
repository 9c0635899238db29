//! User preferences.
//!
//! The most recently updated row wins. When nothing has been stored yet,
//! readers get built-in defaults without anything being written.

use super::connection::CacheDb;
use super::timestamp;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

/// Stored user preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreference {
    /// Row id; None for defaults that were never persisted.
    pub id: Option<i64>,
    pub default_query: Option<String>,
    pub default_type: String,
    pub theme: String,
    pub show_advanced_tips: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UserPreference {
    fn default() -> Self {
        Self {
            id: None,
            default_query: Some("latest news".into()),
            default_type: "general".into(),
            theme: "light".into(),
            show_advanced_tips: true,
            updated_at: None,
        }
    }
}

/// Partial preference update; only `Some` fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceUpdate {
    pub default_query: Option<String>,
    pub default_type: Option<String>,
    pub theme: Option<String>,
    pub show_advanced_tips: Option<bool>,
}

impl UserPreference {
    /// Apply the provided fields of `update`.
    pub fn apply(&mut self, update: PreferenceUpdate) {
        if let Some(query) = update.default_query {
            self.default_query = Some(query);
        }
        if let Some(default_type) = update.default_type {
            self.default_type = default_type;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(show) = update.show_advanced_tips {
            self.show_advanced_tips = show;
        }
    }
}

fn load_latest(conn: &rusqlite::Connection) -> Result<Option<UserPreference>, Error> {
    let row = conn
        .query_row(
            "SELECT id, default_query, default_type, theme, show_advanced_tips, updated_at
             FROM user_preference ORDER BY updated_at DESC, id DESC LIMIT 1",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        )
        .optional()?;

    row.map(|(id, default_query, default_type, theme, show_advanced_tips, updated_at)| {
        Ok(UserPreference {
            id: Some(id),
            default_query,
            default_type,
            theme,
            show_advanced_tips,
            updated_at: Some(timestamp::decode(&updated_at)?),
        })
    })
    .transpose()
}

impl CacheDb {
    /// Latest stored preferences, or defaults if none exist.
    pub async fn latest_preferences(&self) -> Result<UserPreference, Error> {
        self.conn
            .call(|conn| -> Result<UserPreference, Error> { Ok(load_latest(conn)?.unwrap_or_default()) })
            .await
            .map_err(Error::from)
    }

    /// Apply a partial update to the latest preferences and persist the result.
    pub async fn update_preferences(&self, update: PreferenceUpdate) -> Result<UserPreference, Error> {
        self.conn
            .call(move |conn| -> Result<UserPreference, Error> {
                let mut prefs = load_latest(conn)?.unwrap_or_default();
                prefs.apply(update);

                let now = Utc::now();
                let updated_at = timestamp::encode(&now);
                match prefs.id {
                    Some(id) => {
                        conn.execute(
                            "UPDATE user_preference
                             SET default_query = ?1, default_type = ?2, theme = ?3, show_advanced_tips = ?4, updated_at = ?5
                             WHERE id = ?6",
                            params![
                                prefs.default_query,
                                prefs.default_type,
                                prefs.theme,
                                prefs.show_advanced_tips,
                                updated_at,
                                id
                            ],
                        )?;
                    }
                    None => {
                        conn.execute(
                            "INSERT INTO user_preference (default_query, default_type, theme, show_advanced_tips, updated_at)
                             VALUES (?1, ?2, ?3, ?4, ?5)",
                            params![
                                prefs.default_query,
                                prefs.default_type,
                                prefs.theme,
                                prefs.show_advanced_tips,
                                updated_at
                            ],
                        )?;
                        prefs.id = Some(conn.last_insert_rowid());
                    }
                }

                prefs.updated_at = Some(timestamp::decode(&updated_at)?);
                Ok(prefs)
            })
            .await
            .map_err(Error::from)
    }
}
