//! Search gateway: cache first, upstream on miss, cache fallback on failure.
//!
//! [`SearchGateway::search`] always returns a [`SearchResponse`]. Upstream
//! failures only show up in the logs and in [`GatewayHealth`].

use crate::tavily::{TavilyError, parse_search_body};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use marksearch_core::{SearchCache, SearchResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Source of raw search response bodies.
#[async_trait]
pub trait SearchUpstream: Send + Sync {
    /// Run a search and return the response body.
    async fn search(&self, query: &str, search_type: &str) -> Result<String, TavilyError>;
}

/// Health of the upstream as seen by the gateway.
///
/// Starts healthy. Shared with status readers through an `Arc`.
#[derive(Debug)]
pub struct GatewayHealth {
    healthy: AtomicBool,
    last_successful_call: RwLock<Option<DateTime<Utc>>>,
}

impl Default for GatewayHealth {
    fn default() -> Self {
        Self { healthy: AtomicBool::new(true), last_successful_call: RwLock::new(None) }
    }
}

impl GatewayHealth {
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn last_successful_call(&self) -> Option<DateTime<Utc>> {
        match self.last_successful_call.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn record_success(&self, at: DateTime<Utc>) {
        self.healthy.store(true, Ordering::Relaxed);
        match self.last_successful_call.write() {
            Ok(mut guard) => *guard = Some(at),
            Err(poisoned) => *poisoned.into_inner() = Some(at),
        }
    }

    fn record_failure(&self) {
        self.healthy.store(false, Ordering::Relaxed);
    }
}

/// Search Gateway.
#[derive(Clone)]
pub struct SearchGateway {
    upstream: Arc<dyn SearchUpstream>,
    cache: SearchCache,
    health: Arc<GatewayHealth>,
}

impl SearchGateway {
    pub fn new(upstream: Arc<dyn SearchUpstream>, cache: SearchCache) -> Self {
        Self { upstream, cache, health: Arc::new(GatewayHealth::default()) }
    }

    /// Serve a response for (query, search_type).
    ///
    /// A fresh cache entry short-circuits the upstream call. On success the
    /// parsed response is written through and returned with
    /// `from_cache = false`. On any failure the cache is checked once more
    /// and an empty response is returned if it has nothing.
    pub async fn search(&self, query: &str, search_type: &str) -> SearchResponse {
        if let Some(cached) = self.cache.get_cached_result(query, search_type).await {
            return cached;
        }

        let outcome = self
            .upstream
            .search(query, search_type)
            .await
            .and_then(|body| parse_search_body(query, search_type, &body));

        match outcome {
            Ok(response) => {
                self.health.record_success(Utc::now());
                self.cache.save_to_cache(query, search_type, &response).await;
                tracing::debug!(query, search_type, results = response.result_count, "upstream search succeeded");
                response
            }
            Err(err) => {
                self.health.record_failure();
                match &err {
                    TavilyError::HttpError { status } => {
                        tracing::error!(query, search_type, status, "search API returned an error status")
                    }
                    TavilyError::Timeout => tracing::error!(query, search_type, "search API timed out"),
                    other => tracing::error!(query, search_type, error = %other, "search request failed"),
                }
                self.fallback(query, search_type).await
            }
        }
    }

    async fn fallback(&self, query: &str, search_type: &str) -> SearchResponse {
        match self.cache.get_cached_result(query, search_type).await {
            Some(cached) => {
                tracing::warn!(query, search_type, "serving cached response after upstream failure");
                cached
            }
            None => {
                tracing::warn!(query, search_type, "no cached response available; returning empty results");
                SearchResponse::empty(query, search_type)
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.health.is_healthy()
    }

    pub fn last_successful_call_time(&self) -> Option<DateTime<Utc>> {
        self.health.last_successful_call()
    }

    /// Shared handle to the health state.
    pub fn health(&self) -> Arc<GatewayHealth> {
        Arc::clone(&self.health)
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marksearch_core::{CacheDb, SearchResult};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    /// Upstream that replays queued outcomes and counts calls.
    #[derive(Default)]
    struct ScriptedUpstream {
        outcomes: Mutex<VecDeque<Result<String, TavilyError>>>,
        calls: AtomicUsize,
        /// Written to the cache during the call, before the outcome is returned.
        concurrent_write: Option<(SearchCache, SearchResponse)>,
    }

    impl ScriptedUpstream {
        fn with(outcomes: Vec<Result<String, TavilyError>>) -> Self {
            Self { outcomes: Mutex::new(outcomes.into()), ..Default::default() }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchUpstream for ScriptedUpstream {
        async fn search(&self, query: &str, search_type: &str) -> Result<String, TavilyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some((cache, response)) = &self.concurrent_write {
                cache.save_to_cache(query, search_type, response).await;
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TavilyError::Parse("script exhausted".into())))
        }
    }

    fn body(n: usize) -> String {
        let results: Vec<_> = (0..n)
            .map(|i| {
                serde_json::json!({
                    "title": format!("Result {i}"),
                    "url": format!("https://example.com/{i}"),
                    "content": format!("Summary {i}"),
                })
            })
            .collect();
        serde_json::json!({ "results": results }).to_string()
    }

    async fn search_cache() -> SearchCache {
        SearchCache::new(CacheDb::open_in_memory().await.unwrap(), chrono::Duration::minutes(60))
    }

    async fn gateway(upstream: ScriptedUpstream) -> (SearchGateway, Arc<ScriptedUpstream>) {
        let upstream = Arc::new(upstream);
        let gateway = SearchGateway::new(upstream.clone(), search_cache().await);
        (gateway, upstream)
    }

    #[tokio::test]
    async fn test_first_call_live_second_call_cached() {
        let (gateway, upstream) = gateway(ScriptedUpstream::with(vec![Ok(body(3))])).await;

        let first = gateway.search("weather", "general").await;
        assert!(!first.from_cache);
        assert_eq!(first.result_count, 3);
        assert!(gateway.is_healthy());
        assert!(gateway.last_successful_call_time().is_some());

        let second = gateway.search("weather", "general").await;
        assert!(second.from_cache);
        assert_eq!(second.results, first.results);
        assert_eq!(second.result_count, 3);
        assert!(gateway.is_healthy());
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_without_cache() {
        let (gateway, _) = gateway(ScriptedUpstream::with(vec![Err(TavilyError::MissingApiKey)])).await;

        let response = gateway.search("weather", "general").await;
        assert_eq!(response.result_count, 0);
        assert!(response.results.is_empty());
        assert!(!response.from_cache);
        assert!(!gateway.is_healthy());
        assert!(gateway.last_successful_call_time().is_none());
    }

    #[tokio::test]
    async fn test_network_failure_without_cache() {
        let transport = reqwest::Client::new().get("not a url").send().await.unwrap_err();
        let (gateway, upstream) =
            gateway(ScriptedUpstream::with(vec![Err(TavilyError::Network(Arc::new(transport)))])).await;

        let response = gateway.search("weather", "general").await;
        assert!(response.results.is_empty());
        assert_eq!(response.result_count, 0);
        assert!(!response.from_cache);
        assert!(!gateway.is_healthy());
        assert_eq!(upstream.calls(), 1);
        assert_eq!(gateway.cache().cache_entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_http_error_and_timeout_return_empty() {
        let (gateway, upstream) = gateway(ScriptedUpstream::with(vec![
            Err(TavilyError::HttpError { status: 500 }),
            Err(TavilyError::Timeout),
        ]))
        .await;

        assert_eq!(gateway.search("a", "general").await.result_count, 0);
        assert_eq!(gateway.search("b", "news").await.result_count, 0);
        assert!(!gateway.is_healthy());
        assert_eq!(upstream.calls(), 2);
        assert_eq!(gateway.cache().cache_entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_concurrent_cache_write() {
        let cache = search_cache().await;
        let stored = SearchResponse::new(
            "weather",
            "general",
            vec![SearchResult { title: "Stored".into(), url: "https://example.com".into(), ..Default::default() }],
        );
        let upstream = Arc::new(ScriptedUpstream {
            outcomes: Mutex::new(vec![Err(TavilyError::HttpError { status: 503 })].into()),
            concurrent_write: Some((cache.clone(), stored.clone())),
            ..Default::default()
        });
        let gateway = SearchGateway::new(upstream.clone(), cache);

        let response = gateway.search("weather", "general").await;
        assert!(response.from_cache);
        assert_eq!(response.results, stored.results);
        assert_eq!(response.result_count, 1);
        assert!(!gateway.is_healthy());
    }

    #[tokio::test]
    async fn test_parse_failure_is_not_cached() {
        let (gateway, _) = gateway(ScriptedUpstream::with(vec![Ok("not json".into())])).await;

        let response = gateway.search("weather", "general").await;
        assert_eq!(response.result_count, 0);
        assert!(!response.from_cache);
        assert!(!gateway.is_healthy());
        assert_eq!(gateway.cache().cache_entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_success_restores_health() {
        let (gateway, _) =
            gateway(ScriptedUpstream::with(vec![Err(TavilyError::Timeout), Ok(body(2))])).await;

        gateway.search("a", "general").await;
        assert!(!gateway.is_healthy());

        let response = gateway.search("b", "general").await;
        assert_eq!(response.result_count, 2);
        assert!(gateway.is_healthy());
    }

    #[tokio::test]
    async fn test_shared_health_handle() {
        let (gateway, _) = gateway(ScriptedUpstream::with(vec![Err(TavilyError::Timeout)])).await;
        let health = gateway.health();
        assert!(health.is_healthy());

        gateway.search("a", "general").await;
        assert!(!health.is_healthy());
    }

    #[tokio::test]
    async fn test_search_types_cached_separately() {
        let (gateway, upstream) = gateway(ScriptedUpstream::with(vec![Ok(body(1)), Ok(body(2))])).await;

        assert_eq!(gateway.search("rust", "general").await.result_count, 1);
        assert_eq!(gateway.search("rust", "news").await.result_count, 2);
        assert_eq!(upstream.calls(), 2);
        assert_eq!(gateway.cache().cache_entry_count().await, 2);
    }
}
