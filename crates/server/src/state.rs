//! Shared services handed to every tool call.

use marksearch_client::{
    ContentService, FetchClient, FetchConfig, HtmlTextExtractor, PageFetcher, SearchGateway, SearchUpstream,
    TavilyClient, TavilyConfig,
};
use marksearch_core::{AppConfig, CacheDb, SearchCache};
use std::sync::Arc;

/// Services shared across tool calls. Cloning shares the underlying handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: CacheDb,
    pub gateway: SearchGateway,
    pub content: ContentService,
}

impl AppState {
    /// Open the database and build the production clients.
    pub async fn open(config: AppConfig) -> anyhow::Result<Self> {
        let db = CacheDb::open(&config.db_path).await?;
        let tavily = TavilyClient::new(TavilyConfig::from_app_config(&config))?;
        if !tavily.has_api_key() {
            tracing::warn!("no Tavily API key configured; web_search will only serve cached results");
        }
        let fetcher = FetchClient::new(FetchConfig::from_app_config(&config))?;

        Ok(Self::from_parts(config, db, Arc::new(tavily), Arc::new(fetcher)))
    }

    /// Assemble the state from already built collaborators.
    pub fn from_parts(
        config: AppConfig, db: CacheDb, upstream: Arc<dyn SearchUpstream>, fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        let search_cache = SearchCache::new(db.clone(), config.search_cache_ttl());
        let gateway = SearchGateway::new(upstream, search_cache);
        let content = ContentService::new(db.clone(), fetcher, Arc::new(HtmlTextExtractor), config.content_cache_ttl());

        Self { config: Arc::new(config), db, gateway, content }
    }
}
