//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the content cache key for a canonical URL.
///
/// Callers canonicalize the URL first so that trivially different spellings
/// of the same page share one entry.
pub fn compute_cache_key(canonical_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_url.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_cache_key("https://example.com/");
        let hash2 = compute_cache_key("https://example.com/");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_different_urls() {
        let a = compute_cache_key("https://example.com/a");
        let b = compute_cache_key("https://example.com/b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_cache_key("https://example.com/");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
