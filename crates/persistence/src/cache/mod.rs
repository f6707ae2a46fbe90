//! In-memory expiring set for short-lived deduplication

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Set entry with expiration
struct SetEntry {
    inserted_at: Instant,
    ttl: Duration,
}

impl SetEntry {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }
}

/// Thread-safe set whose members expire after a TTL, with a max-entry bound.
///
/// Used to refuse replayed OAuth authorization codes: `insert` returns true
/// only for a key not currently present, so the first caller wins and
/// duplicates within the TTL are rejected. Entries lapse on their own; no
/// timer task is involved.
pub struct ExpiringSet<K: Eq + Hash + Clone> {
    entries: RwLock<HashMap<K, SetEntry>>,
    default_ttl: Duration,
    max_entries: usize,
}

impl<K: Eq + Hash + Clone> ExpiringSet<K> {
    /// Create a new set with the given TTL and max entry count
    pub fn with_capacity(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            max_entries,
        }
    }

    /// Insert a key. Returns false if the key is already present and not
    /// yet expired (a replay). A poisoned lock degrades to no deduplication.
    pub fn insert(&self, key: K) -> bool {
        let Ok(mut entries) = self.entries.write() else {
            return true;
        };

        if let Some(entry) = entries.get(&key) {
            if !entry.is_expired() {
                return false;
            }
        }

        // Evict expired entries if at capacity
        if entries.len() >= self.max_entries {
            entries.retain(|_, entry| !entry.is_expired());
        }

        // If still at capacity after cleanup, evict oldest
        if entries.len() >= self.max_entries {
            if let Some(oldest_key) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest_key);
            }
        }

        entries.insert(
            key,
            SetEntry {
                inserted_at: Instant::now(),
                ttl: self.default_ttl,
            },
        );
        true
    }

    /// Check whether a key is present and not yet expired
    pub fn contains(&self, key: &K) -> bool {
        let Ok(entries) = self.entries.read() else {
            return false;
        };
        entries.get(key).is_some_and(|entry| !entry.is_expired())
    }

    /// Drop all expired entries
    pub fn cleanup(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| !entry.is_expired());
        }
    }

    /// Current entry count (expired-but-unevicted entries included)
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_wins() {
        let set = ExpiringSet::with_capacity(Duration::from_secs(5), 16);

        assert!(set.insert("code-a".to_string()));
        assert!(!set.insert("code-a".to_string()));
        assert!(set.insert("code-b".to_string()));
    }

    #[test]
    fn test_entries_expire() {
        let set = ExpiringSet::with_capacity(Duration::from_millis(10), 16);

        assert!(set.insert("code-a".to_string()));
        std::thread::sleep(Duration::from_millis(25));

        assert!(!set.contains(&"code-a".to_string()));
        // Re-inserting an expired key succeeds again
        assert!(set.insert("code-a".to_string()));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let set = ExpiringSet::with_capacity(Duration::from_secs(60), 2);

        assert!(set.insert(1));
        assert!(set.insert(2));
        assert!(set.insert(3));

        assert_eq!(set.len(), 2);
        // The oldest live entry made room for the newest
        assert!(!set.contains(&1));
        assert!(set.contains(&3));
    }

    #[test]
    fn test_cleanup_drops_expired() {
        let set = ExpiringSet::with_capacity(Duration::from_millis(10), 16);

        set.insert("code-a".to_string());
        std::thread::sleep(Duration::from_millis(25));
        set.cleanup();

        assert!(set.is_empty());
    }
}
