use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use crate::types::{Bucket, FetchResult, LatestPage};
use crate::Result;

/// Snapshot held in one cache slot.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Fetch(FetchResult),
    Latest(LatestPage),
}

#[async_trait]
pub trait ResultStorage: Send + Sync {
    /// Store a snapshot under `key`, replacing whatever was there.
    async fn put(&self, key: &str, value: CachedValue, ttl: Duration) -> Result<()>;

    /// Fetch a live snapshot. Missing and expired keys both yield `None`.
    async fn get(&self, key: &str) -> Result<Option<Arc<CachedValue>>>;

    /// Drop a key regardless of its remaining time-to-live.
    async fn invalidate(&self, key: &str) -> Result<()>;

    async fn get_fetch(&self, bucket: Bucket) -> Result<Option<FetchResult>> {
        Ok(self.get(&bucket.key()).await?.and_then(|value| match value.as_ref() {
            CachedValue::Fetch(result) => Some(result.clone()),
            CachedValue::Latest(_) => None,
        }))
    }

    async fn get_latest(&self, bucket: Bucket) -> Result<Option<LatestPage>> {
        Ok(self.get(&bucket.key()).await?.and_then(|value| match value.as_ref() {
            CachedValue::Latest(page) => Some(page.clone()),
            CachedValue::Fetch(_) => None,
        }))
    }
}
