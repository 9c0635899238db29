//! TTL policy over the search cache store.
//!
//! Nothing here surfaces an error: caching is best-effort, so every store or
//! payload failure is logged and degrades to a miss, a skipped write or a
//! zero count.

use super::SearchResponse;
use crate::CacheDb;
use chrono::{Duration, Utc};

/// Search Cache Manager.
///
/// Decides when a stored response may be served. Callers normalize the
/// query and search type before they get here.
#[derive(Clone, Debug)]
pub struct SearchCache {
    db: CacheDb,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(db: CacheDb, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a fresh cached response.
    ///
    /// An expired entry is deleted and reported as a miss. A hit is returned
    /// with `from_cache = true` and `timestamp` set to now.
    pub async fn get_cached_result(&self, query: &str, search_type: &str) -> Option<SearchResponse> {
        let entry = match self.db.get_search(query, search_type).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::debug!(query, search_type, "search cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(query, search_type, error = %e, "search cache lookup failed");
                return None;
            }
        };

        let now = Utc::now();
        if entry.is_expired_at(now) {
            tracing::debug!(query, search_type, expires_at = %entry.expires_at, "search cache entry expired");
            if let Err(e) = self.db.delete_search(&entry).await {
                tracing::warn!(query, search_type, error = %e, "failed to delete expired search cache entry");
            }
            return None;
        }

        match serde_json::from_str::<SearchResponse>(&entry.response_json) {
            Ok(response) => {
                tracing::debug!(query, search_type, "search cache hit");
                let mut response = response.normalize_count();
                response.from_cache = true;
                response.timestamp = now;
                Some(response)
            }
            Err(e) => {
                tracing::warn!(query, search_type, error = %e, "cached search response could not be decoded");
                None
            }
        }
    }

    /// Store a response for the key, replacing any previous one.
    pub async fn save_to_cache(&self, query: &str, search_type: &str, response: &SearchResponse) {
        let payload = match serde_json::to_string(response) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(query, search_type, error = %e, "search response could not be encoded; not cached");
                return;
            }
        };

        let now = Utc::now();
        let Some(expires_at) = now.checked_add_signed(self.ttl) else {
            tracing::warn!(query, search_type, "cache TTL overflows the expiry time; not cached");
            return;
        };
        match self.db.put_search(query, search_type, &payload, now, expires_at).await {
            Ok(()) => tracing::debug!(query, search_type, %expires_at, "search response cached"),
            Err(e) => tracing::warn!(query, search_type, error = %e, "failed to cache search response"),
        }
    }

    /// Delete every entry that has expired by now.
    pub async fn evict_expired_entries(&self) -> u64 {
        match self.db.delete_expired_search(Utc::now()).await {
            Ok(0) => {
                tracing::debug!("no expired search cache entries");
                0
            }
            Ok(count) => {
                tracing::info!(count, "evicted expired search cache entries");
                count
            }
            Err(e) => {
                tracing::error!(error = %e, "search cache eviction failed");
                0
            }
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn cache_entry_count(&self) -> u64 {
        self.db.count_search().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to count search cache entries");
            0
        })
    }
}
