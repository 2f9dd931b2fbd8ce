//! Read-path cache
//!
//! Short-TTL cache for expensive list reads (order lists with joined items).
//! Concurrent misses on the same key are deduplicated: one caller fetches,
//! the rest wait and reuse the result. Writers invalidate by key, and the
//! change feed invalidates on every broadcast, so the TTL only matters as a
//! backstop.

use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

struct CachedEntry<T> {
    value: Arc<T>,
    inserted_at: Instant,
}

pub struct TtlCache<T> {
    ttl: Duration,
    entries: DashMap<String, CachedEntry<T>>,
    /// Per-key fetch locks for miss deduplication
    pending: DashMap<String, Arc<Mutex<()>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
            pending: DashMap::new(),
        }
    }

    fn get_fresh(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.entries.get(key)?;
        if entry.inserted_at.elapsed() < self.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Get the cached value or run `fetch` once for all concurrent callers.
    /// Fetch errors propagate and are never cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get_fresh(key) {
            return Ok(value);
        }

        let lock = self
            .pending
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // A concurrent caller may have filled the entry while we waited
        if let Some(value) = self.get_fresh(key) {
            return Ok(value);
        }

        let value = Arc::new(fetch().await?);
        self.entries.insert(
            key.to_string(),
            CachedEntry {
                value: value.clone(),
                inserted_at: Instant::now(),
            },
        );
        self.pending.remove(key);
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn caches_within_ttl() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = cache
                .get_or_fetch("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(7)
                })
                .await
                .unwrap();
            assert_eq!(*v, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(1)
        };
        cache.get_or_fetch("k", fetch).await.unwrap();
        cache.invalidate("k");
        cache
            .get_or_fetch("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(2)
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entry_refetches() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(10));
        cache
            .get_or_fetch("k", || async { Ok::<_, ()>(1) })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let v = cache
            .get_or_fetch("k", || async { Ok::<_, ()>(2) })
            .await
            .unwrap();
        assert_eq!(*v, 2);
    }

    #[tokio::test]
    async fn concurrent_misses_fetch_once() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("k", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, ()>(9)
                    })
                    .await
                    .unwrap()
            }));
        }
        for h in handles {
            assert_eq!(*h.await.unwrap(), 9);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let result: Result<_, &str> = cache.get_or_fetch("k", || async { Err("boom") }).await;
        assert!(result.is_err());
        let v = cache
            .get_or_fetch("k", || async { Ok::<_, &str>(3) })
            .await
            .unwrap();
        assert_eq!(*v, 3);
    }
}
