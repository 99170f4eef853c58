use async_trait::async_trait;
use kn_core::{CachedValue, Result, ResultStorage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

struct CacheEntry {
    value: Arc<CachedValue>,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// Process-local cache. Every key carries its own expiry; expired keys are
/// evicted the next time they are read or when a writer sweeps.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ResultStorage for MemoryStorage {
    async fn put(&self, key: &str, value: CachedValue, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let entry = CacheEntry {
            value: Arc::new(value),
            expires_at: now.checked_add(ttl),
        };
        let mut entries = self.entries.write().await;
        entries.retain(|_, existing| existing.is_live(now));
        entries.insert(key.to_string(), entry);
        debug!(key, ttl_secs = ttl.as_secs(), "stored cache entry");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Arc<CachedValue>>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => return Ok(Some(Arc::clone(&entry.value))),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: re-check under the write lock, a writer may have refreshed it.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
            debug!(key, "evicted expired cache entry");
        }
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| Arc::clone(&entry.value)))
    }

    async fn invalidate(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
