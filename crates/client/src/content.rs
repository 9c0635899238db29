//! Page content service: fetch, extract and cache readable page text.

use crate::extract::{ExtractConfig, Extractor, count_words};
use crate::fetch::{PageFetcher, canonicalize};
use chrono::{DateTime, Duration, Utc};
use marksearch_core::cache::hash::compute_cache_key;
use marksearch_core::{CacheDb, ContentEntry, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body stored when a page has no readable text.
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "No readable content was extracted from this page.";

/// Readable content for a URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentResponse {
    pub url: String,
    pub final_url: String,
    pub title: String,
    pub content: String,
    pub word_count: i64,
    pub fetched_at: DateTime<Utc>,
    pub cached: bool,
}

impl ContentResponse {
    fn from_entry(entry: ContentEntry, cached: bool) -> Self {
        Self {
            url: entry.url,
            final_url: entry.final_url,
            title: entry.title,
            content: entry.body,
            word_count: entry.word_count,
            fetched_at: entry.fetched_at,
            cached,
        }
    }
}

/// Fetches pages and keeps their extracted text in the content cache.
#[derive(Clone)]
pub struct ContentService {
    db: CacheDb,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn Extractor>,
    extract_config: ExtractConfig,
    ttl: Duration,
}

impl ContentService {
    pub fn new(db: CacheDb, fetcher: Arc<dyn PageFetcher>, extractor: Arc<dyn Extractor>, ttl: Duration) -> Self {
        Self { db, fetcher, extractor, extract_config: ExtractConfig::default(), ttl }
    }

    pub fn with_extract_config(mut self, config: ExtractConfig) -> Self {
        self.extract_config = config;
        self
    }

    /// Readable content for `url`.
    ///
    /// A cached entry younger than the TTL is returned unless `force_refresh`
    /// is set. Fetch failures are returned as errors; stale content is never
    /// served in their place.
    pub async fn get_content(&self, url: &str, force_refresh: bool) -> Result<ContentResponse, Error> {
        let canonical = canonicalize(url)?;
        let key = compute_cache_key(canonical.as_str());
        let now = Utc::now();

        if !force_refresh {
            match self.db.get_content(&key).await {
                Ok(Some(entry)) if !self.stale_cutoff(now).is_some_and(|cutoff| entry.is_stale(cutoff)) => {
                    tracing::debug!(url = %canonical, "content cache hit");
                    return Ok(ContentResponse::from_entry(entry, true));
                }
                Ok(Some(_)) => tracing::debug!(url = %canonical, "content cache entry stale"),
                Ok(None) => tracing::debug!(url = %canonical, "content cache miss"),
                Err(e) => tracing::warn!(url = %canonical, error = %e, "content cache lookup failed"),
            }
        }

        let fetched = self.fetcher.fetch(&canonical).await?;
        let extracted = self.extractor.extract(&fetched.text(), &self.extract_config)?;

        let title = extracted.title.unwrap_or_else(|| canonical.to_string());
        let body = if extracted.text.trim().is_empty() { EMPTY_CONTENT_PLACEHOLDER.to_string() } else { extracted.text };

        let entry = ContentEntry {
            hash: key,
            url: canonical.to_string(),
            final_url: fetched.final_url.to_string(),
            title,
            word_count: count_words(&body) as i64,
            body,
            content_type: fetched.content_type.clone(),
            status_code: Some(i32::from(fetched.status.as_u16())),
            fetched_at: Utc::now(),
        };

        if let Err(e) = self.db.upsert_content(&entry).await {
            tracing::warn!(url = %entry.url, error = %e, "failed to cache page content");
        }

        Ok(ContentResponse::from_entry(entry, false))
    }

    /// Delete content entries older than the TTL.
    pub async fn evict_stale_entries(&self) -> Result<u64, Error> {
        let Some(cutoff) = self.stale_cutoff(Utc::now()) else {
            return Ok(0);
        };
        let deleted = self.db.purge_content_before(cutoff).await?;
        if deleted > 0 {
            tracing::info!(count = deleted, "evicted stale content cache entries");
        } else {
            tracing::debug!("no stale content cache entries");
        }
        Ok(deleted)
    }

    /// Entries fetched before this are stale; None when the TTL reaches past the earliest time.
    fn stale_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_signed(self.ttl)
    }

    pub fn db(&self) -> &CacheDb {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::HtmlTextExtractor;
    use crate::fetch::FetchResponse;
    use async_trait::async_trait;
    use bytes::Bytes;
    use reqwest::{StatusCode, Url};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fetcher that serves the same page or failure and counts calls.
    struct ScriptedFetcher {
        html: Mutex<Result<String, String>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn page(html: &str) -> Arc<Self> {
            Arc::new(Self { html: Mutex::new(Ok(html.to_string())), calls: AtomicUsize::new(0) })
        }

        fn set(&self, outcome: Result<String, String>) {
            *self.html.lock().unwrap() = outcome;
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let html = self.html.lock().unwrap().clone().map_err(Error::HttpError)?;
            Ok(FetchResponse {
                url: url.clone(),
                final_url: url.clone(),
                status: StatusCode::OK,
                content_type: Some("text/html".into()),
                bytes: Bytes::from(html),
                fetch_ms: 1,
            })
        }
    }

    const PAGE: &str = "<html><head><title>Hello</title></head><body><p>one two three</p></body></html>";

    async fn service(fetcher: Arc<ScriptedFetcher>) -> ContentService {
        let db = CacheDb::open_in_memory().await.unwrap();
        ContentService::new(db, fetcher, Arc::new(HtmlTextExtractor), Duration::hours(24))
    }

    #[tokio::test]
    async fn test_fetch_then_cached() {
        let fetcher = ScriptedFetcher::page(PAGE);
        let service = service(fetcher.clone()).await;

        let first = service.get_content("Example.com/page#frag", false).await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.url, "https://example.com/page");
        assert_eq!(first.title, "Hello");
        assert_eq!(first.content, "one two three");
        assert_eq!(first.word_count, 3);

        let second = service.get_content("https://example.com/page", false).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.content, first.content);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_refetches() {
        let fetcher = ScriptedFetcher::page(PAGE);
        let service = service(fetcher.clone()).await;
        service.get_content("https://example.com/", false).await.unwrap();

        fetcher.set(Ok("<title>Updated</title><p>new</p>".into()));
        let refreshed = service.get_content("https://example.com/", true).await.unwrap();
        assert!(!refreshed.cached);
        assert_eq!(refreshed.title, "Updated");
        assert_eq!(fetcher.calls(), 2);

        let cached = service.get_content("https://example.com/", false).await.unwrap();
        assert_eq!(cached.title, "Updated");
    }

    #[tokio::test]
    async fn test_stale_entry_refetched() {
        let fetcher = ScriptedFetcher::page(PAGE);
        let service = service(fetcher.clone()).await;
        let canonical = canonicalize("https://example.com/").unwrap();

        service
            .db
            .upsert_content(&ContentEntry {
                hash: compute_cache_key(canonical.as_str()),
                url: canonical.to_string(),
                final_url: canonical.to_string(),
                title: "Old".into(),
                body: "old".into(),
                word_count: 1,
                content_type: None,
                status_code: Some(200),
                fetched_at: Utc::now() - Duration::hours(25),
            })
            .await
            .unwrap();

        let response = service.get_content("https://example.com/", false).await.unwrap();
        assert!(!response.cached);
        assert_eq!(response.title, "Hello");
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_title_and_body_fallbacks() {
        let fetcher = ScriptedFetcher::page("<html><body><script>x()</script></body></html>");
        let service = service(fetcher).await;

        let response = service.get_content("https://example.com/empty", false).await.unwrap();
        assert_eq!(response.title, "https://example.com/empty");
        assert_eq!(response.content, EMPTY_CONTENT_PLACEHOLDER);
        assert_eq!(response.word_count, 8);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let fetcher = ScriptedFetcher::page(PAGE);
        fetcher.set(Err("Failed to fetch content. Status: 404".into()));
        let service = service(fetcher).await;

        let result = service.get_content("https://example.com/missing", false).await;
        assert!(matches!(result, Err(Error::HttpError(_))));
        assert_eq!(service.db().count_content().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let fetcher = ScriptedFetcher::page(PAGE);
        let service = service(fetcher.clone()).await;

        assert!(matches!(service.get_content("  ", false).await, Err(Error::InvalidUrl(_))));
        assert!(matches!(service.get_content("ftp://example.com", false).await, Err(Error::InvalidUrl(_))));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_unbounded_ttl_keeps_entries() {
        let fetcher = ScriptedFetcher::page(PAGE);
        let db = CacheDb::open_in_memory().await.unwrap();
        let service = ContentService::new(db, fetcher.clone(), Arc::new(HtmlTextExtractor), Duration::MAX);

        service.get_content("https://example.com/", false).await.unwrap();
        assert!(service.get_content("https://example.com/", false).await.unwrap().cached);
        assert_eq!(service.evict_stale_entries().await.unwrap(), 0);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_evict_stale_entries() {
        let fetcher = ScriptedFetcher::page(PAGE);
        let service = service(fetcher).await;
        service.get_content("https://example.com/fresh", false).await.unwrap();

        let old_url = "https://example.com/old";
        service
            .db
            .upsert_content(&ContentEntry {
                hash: compute_cache_key(old_url),
                url: old_url.into(),
                final_url: old_url.into(),
                title: "Old".into(),
                body: "old".into(),
                word_count: 1,
                content_type: None,
                status_code: None,
                fetched_at: Utc::now() - Duration::hours(48),
            })
            .await
            .unwrap();

        assert_eq!(service.evict_stale_entries().await.unwrap(), 1);
        assert_eq!(service.db().count_content().await.unwrap(), 1);
    }
}
