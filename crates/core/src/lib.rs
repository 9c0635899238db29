//! Core types and shared functionality for marksearch.
//!
//! This crate provides:
//! - SQLite stores for the search cache, page content, history, saved items and preferences
//! - The search response model and the TTL policy around cached responses
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod search;

pub use cache::{CacheDb, ContentEntry, HistoryEntry, PreferenceUpdate, SavedItem, SearchCacheEntry, UserPreference};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use search::{SearchCache, SearchResponse, SearchResult};
