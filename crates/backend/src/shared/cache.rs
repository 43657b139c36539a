//! Session-keyed memo for the filter option loaders.
//!
//! An entry lives until its time-to-live runs out or until the session asks
//! for a refresh. Failed loads are not stored, so the next request retries.
//! At most `max_entries` sessions are held; the oldest entry makes room.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    loaded_at: Instant,
}

/// Session limit used unless `with_max_entries` says otherwise
pub const DEFAULT_MAX_ENTRIES: usize = 256;

pub struct SessionCache<V> {
    name: &'static str,
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> SessionCache<V> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            max_entries: DEFAULT_MAX_ENTRIES,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        entry.loaded_at.elapsed() < self.ttl
    }

    /// Fresh cached value for `session`, if any
    pub async fn get(&self, session: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(session)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.value.clone())
    }

    /// Cached value for `session`, or the result of `loader` stored for next time
    pub async fn get_or_try_load<F, Fut>(&self, session: &str, loader: F) -> anyhow::Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<V>>,
    {
        if let Some(value) = self.get(session).await {
            tracing::debug!("{} cache hit for session {}", self.name, session);
            return Ok(value);
        }

        tracing::debug!("{} cache miss for session {}", self.name, session);
        let value = loader().await?;

        if !self.ttl.is_zero() {
            let mut entries = self.entries.write().await;
            entries.retain(|_, entry| entry.loaded_at.elapsed() < self.ttl);

            while entries.len() >= self.max_entries && !entries.contains_key(session) {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.loaded_at)
                    .map(|(key, _)| key.clone());
                let Some(oldest) = oldest else { break };
                entries.remove(&oldest);
                tracing::debug!("{} cache evicted session {}", self.name, oldest);
            }

            entries.insert(
                session.to_string(),
                CacheEntry {
                    value: value.clone(),
                    loaded_at: Instant::now(),
                },
            );
        }

        Ok(value)
    }

    /// Drop the entry of one session; true when something was cached
    pub async fn invalidate(&self, session: &str) -> bool {
        let removed = self.entries.write().await.remove(session).is_some();
        if removed {
            tracing::info!("{} cache invalidated for session {}", self.name, session);
        }
        removed
    }

    /// Number of stored entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn load_counting(counter: &AtomicUsize) -> anyhow::Result<usize> {
        Ok(counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl_and_reload_after_expiry() {
        let cache = SessionCache::new("test", Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        let first = cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();
        let second = cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 1);

        tokio::time::advance(Duration::from_secs(61)).await;

        let third = cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();
        assert_eq!(third, 2);
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let cache = SessionCache::new("test", Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load("a", || load_counting(&loads)).await.unwrap();
        let b = cache.get_or_try_load("b", || load_counting(&loads)).await.unwrap();

        assert_eq!(b, 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let cache = SessionCache::new("test", Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();
        assert!(cache.invalidate("s1").await);
        assert!(!cache.invalidate("s1").await);

        let reloaded = cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();
        assert_eq!(reloaded, 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache: SessionCache<usize> = SessionCache::new("test", Duration::from_secs(60));

        let failed = cache
            .get_or_try_load("s1", || async { Err(anyhow::anyhow!("warehouse down")) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get("s1").await.is_none());

        let ok = cache.get_or_try_load("s1", || async { Ok(7) }).await.unwrap();
        assert_eq!(ok, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oldest_session_makes_room() {
        let cache = SessionCache::new("test", Duration::from_secs(600)).with_max_entries(3);
        let loads = AtomicUsize::new(0);

        for i in 0..10 {
            let session = format!("s{}", i);
            cache.get_or_try_load(&session, || load_counting(&loads)).await.unwrap();
            tokio::time::advance(Duration::from_secs(1)).await;
        }

        assert_eq!(cache.len().await, 3);
        assert!(cache.get("s6").await.is_none());
        assert_eq!(cache.get("s7").await, Some(8));
        assert_eq!(cache.get("s9").await, Some(10));

        // Reloading a held session does not evict anybody
        cache.invalidate("s9").await;
        cache.get_or_try_load("s8", || load_counting(&loads)).await.unwrap();
        cache.get_or_try_load("s9", || load_counting(&loads)).await.unwrap();
        assert_eq!(cache.len().await, 3);
        assert_eq!(cache.get("s7").await, Some(8));
    }

    #[tokio::test]
    async fn test_zero_ttl_disables_caching() {
        let cache = SessionCache::new("test", Duration::ZERO);
        let loads = AtomicUsize::new(0);

        cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();
        cache.get_or_try_load("s1", || load_counting(&loads)).await.unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty().await);
    }
}
