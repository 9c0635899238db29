//! Tavily Search API request body.

use marksearch_core::search::topic_for;
use serde::Serialize;

/// Search depth sent with every request.
pub const SEARCH_DEPTH: &str = "basic";

/// Results requested per search.
pub const MAX_RESULTS: u8 = 10;

/// JSON body for `POST /search`.
///
/// Only the query, the key and the topic vary; everything else is fixed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub api_key: String,
    pub query: String,
    pub search_depth: &'static str,
    pub include_answer: bool,
    pub include_images: bool,
    pub include_raw_content: bool,
    pub max_results: u8,
    pub topic: &'static str,
}

impl SearchRequest {
    /// Build a request; `search_type == "news"` selects the news topic.
    pub fn new(api_key: impl Into<String>, query: impl Into<String>, search_type: &str) -> Self {
        Self {
            api_key: api_key.into(),
            query: query.into(),
            search_depth: SEARCH_DEPTH,
            include_answer: false,
            include_images: false,
            include_raw_content: false,
            max_results: MAX_RESULTS,
            topic: topic_for(search_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_parameters() {
        let req = SearchRequest::new("tvly-key", "weather", "general");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["api_key"], "tvly-key");
        assert_eq!(json["query"], "weather");
        assert_eq!(json["search_depth"], "basic");
        assert_eq!(json["include_answer"], false);
        assert_eq!(json["include_images"], false);
        assert_eq!(json["include_raw_content"], false);
        assert_eq!(json["max_results"], 10);
        assert_eq!(json["topic"], "general");
    }

    #[test]
    fn test_news_topic() {
        assert_eq!(SearchRequest::new("k", "q", "news").topic, "news");
        assert_eq!(SearchRequest::new("k", "q", "images").topic, "general");
    }
}
