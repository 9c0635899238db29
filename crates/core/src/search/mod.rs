//! Search data model and cache policy.

mod cache;

pub use cache::SearchCache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Search type that selects the upstream's news topic.
pub const NEWS_SEARCH_TYPE: &str = "news";

/// A single search hit.
///
/// Every field is a plain string; values missing upstream become empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub summary: String,
    #[serde(default)]
    pub full_content: String,
}

/// The response returned for a search, live or cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub search_type: String,
    pub results: Vec<SearchResult>,
    /// Always `results.len()`.
    pub result_count: usize,
    /// When this response was produced for the caller.
    pub timestamp: DateTime<Utc>,
    pub from_cache: bool,
}

impl SearchResponse {
    /// A live response stamped with the current time.
    pub fn new(query: impl Into<String>, search_type: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.into(),
            search_type: search_type.into(),
            result_count: results.len(),
            results,
            timestamp: Utc::now(),
            from_cache: false,
        }
    }

    /// A response with no results, returned when nothing better is available.
    pub fn empty(query: impl Into<String>, search_type: impl Into<String>) -> Self {
        Self::new(query, search_type, Vec::new())
    }

    /// Recompute `result_count` from `results`.
    pub(crate) fn normalize_count(mut self) -> Self {
        self.result_count = self.results.len();
        self
    }
}

/// Upstream topic for a search type.
pub fn topic_for(search_type: &str) -> &'static str {
    if search_type == NEWS_SEARCH_TYPE { "news" } else { "general" }
}
