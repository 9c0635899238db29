//! Background eviction of expired cache entries.

use marksearch_client::ContentService;
use marksearch_core::SearchCache;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Totals from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub search_entries: u64,
    pub content_entries: u64,
}

/// Remove expired search responses and stale page content.
pub async fn sweep_once(search_cache: &SearchCache, content: &ContentService) -> SweepReport {
    let search_entries = search_cache.evict_expired_entries().await;
    let content_entries = content.evict_stale_entries().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "content cache eviction failed");
        0
    });
    SweepReport { search_entries, content_entries }
}

/// Run [`sweep_once`] every `period` on its own task.
///
/// The first sweep runs immediately, then once per period.
pub fn spawn(search_cache: SearchCache, content: ContentService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tracing::info!(period_ms = period.as_millis() as u64, "cache eviction sweeper started");

        loop {
            interval.tick().await;
            let report = sweep_once(&search_cache, &content).await;
            tracing::debug!(
                search_entries = report.search_entries,
                content_entries = report.content_entries,
                "cache sweep finished"
            );
        }
    })
}
