/*!
 * Anonymization Cache
 * Stable plain-text to token mapping for scrubbing identifying data from logs
 */

use crate::util::encoding::encode_id;
use log::trace;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Guarded, idempotent mapping from plain text to an obfuscated token.
///
/// The digest is an additive byte sum: irreversible in practice, short, and
/// quite simple. This is for log scrubbing, not security. The shared salt
/// counter keeps tokens distinct even when two inputs collide on the digest.
///
/// Entries live for the lifetime of the cache; anonymizing the same text
/// twice always yields the same token. Concurrent first-time anonymizations
/// of the same text may each compute a candidate; the mapping lock serializes
/// the stores and whichever one wins is what every later caller observes.
pub struct AnonymizationCache {
    mappings: Mutex<HashMap<String, String>>,
    salt: AtomicU32,
}

impl AnonymizationCache {
    pub fn new() -> Self {
        Self {
            mappings: Mutex::new(HashMap::new()),
            salt: AtomicU32::new(0),
        }
    }

    /// Returns the stable token for `text`, creating one on first use.
    ///
    /// Empty input is the documented degenerate case: the registration
    /// no-ops, nothing is cached, and each call burns a fresh salt.
    pub fn anonymize(&self, text: &str) -> String {
        {
            let mappings = self.mappings.lock();
            if let Some(token) = mappings.get(text) {
                if text != token {
                    trace!("Found anonymized [{}] -> [{}]", text, token);
                }
                return token.clone();
            }
        }

        // We just need something irreversible, short, and quite simple.
        let digest: u64 = text.bytes().map(u64::from).sum();

        // The '#' hints that the value is anonymized. The salt prefix keeps
        // tokens unique when digests collide (which they will, eventually).
        let salt = self.salt.fetch_add(1, Ordering::Relaxed);
        let token = format!(
            "#{}#{}#",
            encode_id(u64::from(salt), 0),
            encode_id(digest, 0)
        );
        self.register_mapping(text, &token);
        token
    }

    /// Force-inserts or overwrites a mapping. No-op if either string is
    /// empty.
    pub fn register_mapping(&self, plain: &str, anonymized: &str) {
        if plain.is_empty() || anonymized.is_empty() {
            return;
        }

        if plain != anonymized {
            trace!("Anonymizing [{}] -> [{}]", plain, anonymized);
        }

        self.mappings
            .lock()
            .insert(plain.to_string(), anonymized.to_string());
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.mappings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.lock().is_empty()
    }
}

impl Default for AnonymizationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_anonymize_idempotent() {
        let cache = AnonymizationCache::new();
        let first = cache.anonymize("document.odt");
        let second = cache.anonymize("document.odt");
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_anonymize_distinct_inputs() {
        let cache = AnonymizationCache::new();
        assert_ne!(cache.anonymize("alpha"), cache.anonymize("beta"));
    }

    #[test]
    fn test_digest_collision_distinguished_by_salt() {
        // "ab" and "ba" have identical byte sums; only the salt separates
        // their tokens.
        let cache = AnonymizationCache::new();
        let a = cache.anonymize("ab");
        let b = cache.anonymize("ba");
        assert_ne!(a, b);

        let salt_of = |t: &str| t.split('#').nth(1).unwrap().to_string();
        let digest_of = |t: &str| t.split('#').nth(2).unwrap().to_string();
        assert_eq!(digest_of(&a), digest_of(&b));
        assert_ne!(salt_of(&a), salt_of(&b));
    }

    #[test]
    fn test_token_format() {
        let cache = AnonymizationCache::new();
        let token = cache.anonymize("x");
        assert!(token.starts_with('#'));
        assert!(token.ends_with('#'));
        assert_eq!(token.matches('#').count(), 3);
    }

    #[test]
    fn test_empty_input_never_cached() {
        let cache = AnonymizationCache::new();
        let first = cache.anonymize("");
        assert_eq!(cache.len(), 0);

        // Nothing was stored, so a second call computes a fresh salt rather
        // than reusing a stored empty-key token.
        let second = cache.anonymize("");
        assert_eq!(cache.len(), 0);
        assert_ne!(first, second);
    }

    #[test]
    fn test_register_mapping_overwrites() {
        let cache = AnonymizationCache::new();
        cache.register_mapping("plain", "#0#1#");
        cache.register_mapping("plain", "#9#9#");
        assert_eq!(cache.anonymize("plain"), "#9#9#");
    }

    #[test]
    fn test_register_mapping_empty_noop() {
        let cache = AnonymizationCache::new();
        cache.register_mapping("", "token");
        cache.register_mapping("plain", "");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_anonymize_stable_once_observed() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(AnonymizationCache::new());
        let mut handles = vec![];
        for _ in 0..8 {
            let c = Arc::clone(&cache);
            handles.push(thread::spawn(move || c.anonymize("shared.odt")));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // Whatever the race produced, the stored value is now stable.
        let settled = cache.anonymize("shared.odt");
        assert_eq!(settled, cache.anonymize("shared.odt"));
        assert_eq!(cache.len(), 1);
    }
}
