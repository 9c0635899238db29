//! Tavily client error types.

use std::sync::Arc;

/// Errors from the Tavily Search API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TavilyError {
    /// No API key configured.
    #[error("missing API key: MARKSEARCH_TAVILY_API_KEY not set")]
    MissingApiKey,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TavilyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TavilyError::Timeout } else { TavilyError::Network(Arc::new(err)) }
    }
}

impl From<serde_json::Error> for TavilyError {
    fn from(err: serde_json::Error) -> Self {
        TavilyError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TavilyError::MissingApiKey;
        assert!(err.to_string().contains("API key"));

        let err = TavilyError::HttpError { status: 502 };
        assert_eq!(err.to_string(), "HTTP error: 502");
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        assert!(matches!(TavilyError::from(parse_err), TavilyError::Parse(_)));
    }
}
