//! Tavily Search API response parsing.
//!
//! The body is read as loose JSON. Only a body that is not JSON at all is an
//! error; odd shapes inside it degrade to empty lists and strings.

use super::TavilyError;
use marksearch_core::{SearchResponse, SearchResult};
use serde_json::Value;

/// Text of a result field: strings as is, other scalars in their JSON form,
/// missing or null as empty.
fn text_field(result: &Value, key: &str) -> String {
    match result.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn to_search_result(raw: &Value) -> SearchResult {
    SearchResult {
        title: text_field(raw, "title"),
        url: text_field(raw, "url"),
        summary: text_field(raw, "content"),
        full_content: text_field(raw, "raw_content"),
    }
}

/// Parse a response body into a live [`SearchResponse`].
///
/// Results keep upstream order and `result_count` is recomputed. A `results`
/// value that is not an array yields no results.
pub fn parse_search_body(query: &str, search_type: &str, body: &str) -> Result<SearchResponse, TavilyError> {
    let raw: Value = serde_json::from_str(body)?;
    let results = match raw.get("results") {
        Some(Value::Array(items)) => items.iter().map(to_search_result).collect(),
        _ => Vec::new(),
    };

    Ok(SearchResponse::new(query, search_type, results))
}
