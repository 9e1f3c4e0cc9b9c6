use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process key/value cache with per-entry TTL.
///
/// Only used for OTP staging: entries are short-lived, low-volume, and never
/// persisted. Expired entries are dropped on read and swept opportunistically
/// on write.
pub struct TtlCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl TtlCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Process-wide cache instance
    pub fn global() -> &'static TtlCache {
        static INSTANCE: OnceLock<TtlCache> = OnceLock::new();
        INSTANCE.get_or_init(TtlCache::new)
    }

    /// Store a value, replacing any existing entry under the same key
    pub async fn set_value(&self, key: &str, value: &str, ttl: Duration) {
        let mut entries = self.entries.write().await;

        // Sweep anything already past its deadline while we hold the lock
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
    }

    /// Fetch a value; never returns an expired entry
    pub async fn get_value(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(e) if e.expires_at > Instant::now() => return Some(e.value.clone()),
                Some(_) => {} // expired, fall through to remove
                None => return None,
            }
        }

        // Entry exists but expired: drop it under the write lock
        let mut entries = self.entries.write().await;
        if let Some(e) = entries.get(key) {
            if e.expires_at <= Instant::now() {
                entries.remove(key);
            }
        }
        None
    }

    /// Compare-and-delete under a single write lock: removes the entry and
    /// returns true only when it is unexpired and equals `expected`. Two
    /// concurrent callers with the same key can never both succeed.
    pub async fn remove_if_eq(&self, key: &str, expected: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(e) if e.expires_at <= Instant::now() => {
                entries.remove(key);
                false
            }
            Some(e) if e.value == expected => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Remove an entry, returning whether it was present (and unexpired)
    pub async fn delete_value(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.remove(key) {
            Some(e) => e.expires_at > Instant::now(),
            None => false,
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = TtlCache::new();
        cache.set_value("k", "123456", Duration::from_secs(600)).await;
        assert_eq!(cache.get_value("k").await.as_deref(), Some("123456"));
    }

    #[tokio::test]
    async fn get_never_returns_expired_value() {
        let cache = TtlCache::new();
        cache.set_value("k", "123456", Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get_value("k").await, None);
    }

    #[tokio::test]
    async fn set_replaces_existing_entry() {
        let cache = TtlCache::new();
        cache.set_value("k", "first", Duration::from_secs(600)).await;
        cache.set_value("k", "second", Duration::from_secs(600)).await;
        assert_eq!(cache.get_value("k").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = TtlCache::new();
        cache.set_value("k", "123456", Duration::from_secs(600)).await;
        assert!(cache.delete_value("k").await);
        assert_eq!(cache.get_value("k").await, None);
        // Second delete reports nothing was there
        assert!(!cache.delete_value("k").await);
    }

    #[tokio::test]
    async fn remove_if_eq_consumes_only_on_match() {
        let cache = TtlCache::new();
        cache.set_value("k", "123456", Duration::from_secs(600)).await;

        assert!(!cache.remove_if_eq("k", "000000").await);
        // Mismatch left the entry in place
        assert_eq!(cache.get_value("k").await.as_deref(), Some("123456"));

        assert!(cache.remove_if_eq("k", "123456").await);
        // A second taker loses: the entry is gone
        assert!(!cache.remove_if_eq("k", "123456").await);
    }

    #[tokio::test]
    async fn remove_if_eq_rejects_expired_entries() {
        let cache = TtlCache::new();
        cache.set_value("k", "123456", Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(!cache.remove_if_eq("k", "123456").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = TtlCache::new();
        cache.set_value("a", "1", Duration::from_secs(600)).await;
        cache.set_value("b", "2", Duration::from_secs(600)).await;
        cache.delete_value("a").await;
        assert_eq!(cache.get_value("b").await.as_deref(), Some("2"));
    }
}
