//! Search cache store.
//!
//! Persistent storage for upstream search responses keyed by
//! (query, search_type). This layer knows nothing about TTL policy: it stores
//! whatever timestamps it is given and never filters on expiry when reading.
//! Policy lives in [`crate::search::SearchCache`].

use super::connection::CacheDb;
use super::timestamp;
use crate::Error;
use chrono::{DateTime, Utc};
use tokio_rusqlite::{params, rusqlite};

/// A stored search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCacheEntry {
    pub id: i64,
    pub query: String,
    pub search_type: String,
    pub response_json: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SearchCacheEntry {
    /// Whether the entry has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

impl CacheDb {
    /// Get the search cache entry for a key.
    ///
    /// Returns None if the key doesn't exist. Expired entries are returned as-is.
    pub async fn get_search(&self, query: &str, search_type: &str) -> Result<Option<SearchCacheEntry>, Error> {
        let query = query.to_string();
        let search_type = search_type.to_string();
        self.conn
            .call(move |conn| -> Result<Option<SearchCacheEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT id, query, search_type, response_json, created_at, expires_at
                     FROM search_cache WHERE query = ?1 AND search_type = ?2",
                )?;

                let result = stmt.query_row(params![query, search_type], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                });

                match result {
                    Ok((id, query, search_type, response_json, created_at, expires_at)) => Ok(Some(SearchCacheEntry {
                        id,
                        query,
                        search_type,
                        response_json,
                        created_at: timestamp::decode(&created_at)?,
                        expires_at: timestamp::decode(&expires_at)?,
                    })),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a cached search response.
    ///
    /// Uses UPSERT semantics on (query, search_type): an existing row keeps its
    /// id and has its payload and both timestamps replaced.
    pub async fn put_search(
        &self, query: &str, search_type: &str, response_json: &str, created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let query = query.to_string();
        let search_type = search_type.to_string();
        let response_json = response_json.to_string();
        let created_at = timestamp::encode(&created_at);
        let expires_at = timestamp::encode(&expires_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO search_cache (query, search_type, response_json, created_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(query, search_type) DO UPDATE SET
                        response_json = excluded.response_json,
                        created_at = excluded.created_at,
                        expires_at = excluded.expires_at",
                    params![query, search_type, response_json, created_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a specific search cache entry.
    ///
    /// The row is only removed while it still carries the entry's `expires_at`;
    /// a concurrent upsert of the same key survives. Returns whether a row was removed.
    pub async fn delete_search(&self, entry: &SearchCacheEntry) -> Result<bool, Error> {
        let id = entry.id;
        let expires_at = timestamp::encode(&entry.expires_at);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute(
                    "DELETE FROM search_cache WHERE id = ?1 AND expires_at = ?2",
                    params![id, expires_at],
                )?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete search cache entries that expired strictly before `before`.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_expired_search(&self, before: DateTime<Utc>) -> Result<u64, Error> {
        let before = timestamp::encode(&before);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM search_cache WHERE expires_at < ?1", params![before])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Count every search cache entry, expired or not.
    pub async fn count_search(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM search_cache", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
