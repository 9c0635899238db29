//! Search history log.
//!
//! Writes are idempotent over a short window: recording the same
//! (query, search_type) again while the previous record is still younger than
//! the window returns that record instead of inserting a new one.

use super::connection::CacheDb;
use super::timestamp;
use crate::Error;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

/// Search type recorded when the caller leaves it blank.
pub const DEFAULT_SEARCH_TYPE: &str = "general";

/// Number of entries returned by [`CacheDb::recent_history`] when callers have no preference.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// A recorded search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub query: String,
    pub search_type: String,
    pub results_count: Option<i64>,
    pub searched_at: DateTime<Utc>,
}

type HistoryRow = (i64, String, String, Option<i64>, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_entry((id, query, search_type, results_count, searched_at): HistoryRow) -> Result<HistoryEntry, Error> {
    Ok(HistoryEntry { id, query, search_type, results_count, searched_at: timestamp::decode(&searched_at)? })
}

impl CacheDb {
    /// Record a search, collapsing repeats inside `dedupe_window`.
    ///
    /// The query is trimmed and must not be empty; a blank search type becomes
    /// [`DEFAULT_SEARCH_TYPE`]. The lookup and the insert run in one call on
    /// the connection thread.
    pub async fn record_history(
        &self, query: &str, search_type: Option<&str>, results_count: Option<i64>, dedupe_window: Duration,
    ) -> Result<HistoryEntry, Error> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Err(Error::InvalidInput("query must not be empty".into()));
        }
        let search_type = match search_type.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_SEARCH_TYPE.to_string(),
        };

        self.conn
            .call(move |conn| -> Result<HistoryEntry, Error> {
                let now = Utc::now();

                let latest = conn
                    .query_row(
                        "SELECT id, query, search_type, results_count, searched_at FROM search_history
                         WHERE query = ?1 AND search_type = ?2
                         ORDER BY searched_at DESC, id DESC LIMIT 1",
                        params![query, search_type],
                        read_row,
                    )
                    .optional()?;

                if let Some(row) = latest {
                    let existing = into_entry(row)?;
                    if now - existing.searched_at < dedupe_window {
                        tracing::debug!(id = existing.id, query = %existing.query, "collapsing repeated history entry");
                        return Ok(existing);
                    }
                }

                conn.execute(
                    "INSERT INTO search_history (query, search_type, results_count, searched_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![query, search_type, results_count, timestamp::encode(&now)],
                )?;

                Ok(HistoryEntry {
                    id: conn.last_insert_rowid(),
                    query,
                    search_type,
                    results_count,
                    searched_at: timestamp::decode(&timestamp::encode(&now))?,
                })
            })
            .await
            .map_err(Error::from)
    }

    /// Most recent searches, newest first.
    pub async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, Error> {
        let limit = limit as i64;
        self.conn
            .call(move |conn| -> Result<Vec<HistoryEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, query, search_type, results_count, searched_at FROM search_history
                     ORDER BY searched_at DESC, id DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], read_row)?;

                let mut entries = Vec::new();
                for row in rows {
                    entries.push(into_entry(row?)?);
                }
                Ok(entries)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete all history.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear_history(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM search_history", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
