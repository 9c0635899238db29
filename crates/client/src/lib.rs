//! Client code for marksearch.
//!
//! This crate provides the Tavily search client, the search gateway with its
//! cache fallback and health tracking, and the page fetch/extract pipeline
//! behind the content cache.

pub mod content;
pub mod extract;
pub mod fetch;
pub mod gateway;
pub mod tavily;

pub use content::{ContentResponse, ContentService, EMPTY_CONTENT_PLACEHOLDER};
pub use extract::{ExtractConfig, ExtractionResult, Extractor, HtmlTextExtractor, extract_text};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, PageFetcher};
pub use gateway::{GatewayHealth, SearchGateway, SearchUpstream};
pub use tavily::{TavilyClient, TavilyConfig, TavilyError};
