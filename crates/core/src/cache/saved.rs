//! Saved items (bookmarks).

use super::connection::CacheDb;
use super::timestamp;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

/// A bookmarked search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedItem {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub saved_at: DateTime<Utc>,
}

type SavedRow = (i64, String, String, Option<String>, Option<String>, String);

const SELECT_SAVED: &str = "SELECT id, title, url, summary, notes, saved_at FROM saved_items";

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavedRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
}

fn into_item((id, title, url, summary, notes, saved_at): SavedRow) -> Result<SavedItem, Error> {
    Ok(SavedItem { id, title, url, summary, notes, saved_at: timestamp::decode(&saved_at)? })
}

fn find_by_id(conn: &rusqlite::Connection, id: i64) -> Result<Option<SavedItem>, Error> {
    conn.query_row(&format!("{SELECT_SAVED} WHERE id = ?1"), params![id], read_row)
        .optional()?
        .map(into_item)
        .transpose()
}

impl CacheDb {
    /// All saved items, newest first.
    pub async fn list_saved_items(&self) -> Result<Vec<SavedItem>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<SavedItem>, Error> {
                let mut stmt = conn.prepare(&format!("{SELECT_SAVED} ORDER BY saved_at DESC, id DESC"))?;
                let rows = stmt.query_map([], read_row)?;

                let mut items = Vec::new();
                for row in rows {
                    items.push(into_item(row?)?);
                }
                Ok(items)
            })
            .await
            .map_err(Error::from)
    }

    /// Save a new item.
    ///
    /// Fails with [`Error::AlreadyExists`] if the URL is already saved.
    pub async fn save_item(&self, title: &str, url: &str, summary: Option<&str>) -> Result<SavedItem, Error> {
        if url.trim().is_empty() {
            return Err(Error::InvalidInput("url must not be empty".into()));
        }
        if title.trim().is_empty() {
            return Err(Error::InvalidInput("title must not be empty".into()));
        }

        let title = title.to_string();
        let url = url.to_string();
        let summary = summary.map(str::to_string);
        self.conn
            .call(move |conn| -> Result<SavedItem, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM saved_items WHERE url = ?1)",
                    params![url],
                    |row| row.get(0),
                )?;
                if exists {
                    return Err(Error::AlreadyExists("This URL is already saved".into()));
                }

                let saved_at = timestamp::encode(&Utc::now());
                conn.execute(
                    "INSERT INTO saved_items (title, url, summary, notes, saved_at) VALUES (?1, ?2, ?3, NULL, ?4)",
                    params![title, url, summary, saved_at],
                )?;

                let id = conn.last_insert_rowid();
                find_by_id(conn, id)?
                    .ok_or_else(|| Error::NotFound("saved item vanished after insert".into()))
            })
            .await
            .map_err(Error::from)
    }

    /// Replace the notes on a saved item.
    pub async fn update_saved_notes(&self, id: i64, notes: Option<&str>) -> Result<SavedItem, Error> {
        let notes = notes.map(str::to_string);
        self.conn
            .call(move |conn| -> Result<SavedItem, Error> {
                let updated = conn.execute("UPDATE saved_items SET notes = ?1 WHERE id = ?2", params![notes, id])?;
                if updated == 0 {
                    return Err(Error::NotFound(format!("saved item {id}")));
                }
                find_by_id(conn, id)?.ok_or_else(|| Error::NotFound(format!("saved item {id}")))
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a saved item.
    pub async fn delete_saved_item(&self, id: i64) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let deleted = conn.execute("DELETE FROM saved_items WHERE id = ?1", params![id])?;
                if deleted == 0 {
                    return Err(Error::NotFound(format!("saved item {id}")));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Whether a URL has been saved.
    pub async fn saved_url_exists(&self, url: &str) -> Result<bool, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM saved_items WHERE url = ?1)",
                    params![url],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }
}
