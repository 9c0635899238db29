//! Content cache operations.
//!
//! Stores extracted page text keyed by the hash of the canonical URL, along
//! with enough fetch metadata to decide staleness and report provenance.

use super::connection::CacheDb;
use super::timestamp;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

/// A cached, extracted page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentEntry {
    pub hash: String,
    pub url: String,
    pub final_url: String,
    pub title: String,
    pub body: String,
    pub word_count: i64,
    pub content_type: Option<String>,
    pub status_code: Option<i32>,
    pub fetched_at: DateTime<Utc>,
}

impl ContentEntry {
    /// Whether the entry was fetched before `cutoff`.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.fetched_at < cutoff
    }
}

impl CacheDb {
    /// Insert or update a cached page.
    ///
    /// Uses UPSERT semantics: inserts if the hash doesn't exist,
    /// updates all fields if it does.
    pub async fn upsert_content(&self, entry: &ContentEntry) -> Result<(), Error> {
        let entry = entry.clone();
        let fetched_at = timestamp::encode(&entry.fetched_at);
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO content_cache (
                    hash, url, final_url, title, body, word_count, content_type, status_code, fetched_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(hash) DO UPDATE SET
                    url = excluded.url,
                    final_url = excluded.final_url,
                    title = excluded.title,
                    body = excluded.body,
                    word_count = excluded.word_count,
                    content_type = excluded.content_type,
                    status_code = excluded.status_code,
                    fetched_at = excluded.fetched_at",
                    params![
                        &entry.hash,
                        &entry.url,
                        &entry.final_url,
                        &entry.title,
                        &entry.body,
                        entry.word_count,
                        &entry.content_type,
                        &entry.status_code,
                        fetched_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a cached page by hash.
    ///
    /// Returns None if the hash doesn't exist in the cache.
    pub async fn get_content(&self, hash: &str) -> Result<Option<ContentEntry>, Error> {
        let hash = hash.to_string();
        self.conn
            .call(move |conn| -> Result<Option<ContentEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT hash, url, final_url, title, body, word_count, content_type, status_code, fetched_at
                     FROM content_cache WHERE hash = ?1",
                )?;

                let result = stmt.query_row(params![hash], |row| {
                    Ok((
                        ContentEntry {
                            hash: row.get(0)?,
                            url: row.get(1)?,
                            final_url: row.get(2)?,
                            title: row.get(3)?,
                            body: row.get(4)?,
                            word_count: row.get(5)?,
                            content_type: row.get(6)?,
                            status_code: row.get(7)?,
                            fetched_at: DateTime::<Utc>::MIN_UTC,
                        },
                        row.get::<_, String>(8)?,
                    ))
                });

                match result {
                    Ok((mut entry, fetched_at)) => {
                        entry.fetched_at = timestamp::decode(&fetched_at)?;
                        Ok(Some(entry))
                    }
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Delete pages fetched before `cutoff`.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_content_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = timestamp::encode(&cutoff);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM content_cache WHERE fetched_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete pages whose URL contains `domain`.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_content_by_domain(&self, domain: &str) -> Result<u64, Error> {
        let pattern = format!("%{domain}%");
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM content_cache WHERE url LIKE ?1", params![pattern])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Purge oldest pages until count <= max_entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_lru_content(&self, max_entries: usize) -> Result<u64, Error> {
        let max = i64::try_from(max_entries).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM content_cache", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM content_cache WHERE hash IN (
                    SELECT hash FROM content_cache ORDER BY fetched_at ASC LIMIT ?1
                )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count cached pages.
    pub async fn count_content(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM content_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
