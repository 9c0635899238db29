//! SQLite-backed stores for marksearch.
//!
//! One database file holds every table the service needs, accessed through
//! tokio-rusqlite so each operation runs on the connection's own thread:
//!
//! - `search_cache`: upstream search responses keyed by (query, search_type)
//! - `content_cache`: extracted page text keyed by a hash of the canonical URL
//! - `search_history`, `saved_items`, `user_preference`: user data
//!
//! Schema changes are applied by versioned migrations when the database opens.

pub mod connection;
pub mod content;
pub mod hash;
pub mod history;
pub mod migrations;
pub mod preferences;
pub mod saved;
pub mod search;
pub mod timestamp;

pub use crate::Error;

pub use connection::CacheDb;
pub use content::ContentEntry;
pub use history::HistoryEntry;
pub use preferences::{PreferenceUpdate, UserPreference};
pub use saved::SavedItem;
pub use search::SearchCacheEntry;
