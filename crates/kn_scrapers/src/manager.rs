use chrono::Utc;
use kn_core::{Bucket, CachedValue, FetchResult, LatestPage, RecentNews, ResultStorage};
use kn_storage::TtlPolicy;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::fetcher::NewsFetcher;

/// Upper bound for `per_page` on latest pages.
pub const MAX_PER_PAGE: usize = 100;

/// Connects the fetcher to the cache: decides what gets stored, under which
/// key and for how long.
pub struct NewsManager {
    fetcher: NewsFetcher,
    storage: Arc<dyn ResultStorage>,
    ttl: TtlPolicy,
}

impl NewsManager {
    pub fn new(fetcher: NewsFetcher, storage: Arc<dyn ResultStorage>, ttl: TtlPolicy) -> Self {
        Self {
            fetcher,
            storage,
            ttl,
        }
    }

    pub fn fetcher(&self) -> &NewsFetcher {
        &self.fetcher
    }

    pub fn storage(&self) -> Arc<dyn ResultStorage> {
        Arc::clone(&self.storage)
    }

    /// Fetches both recent days and overwrites their buckets.
    ///
    /// A failed fetch leaves the previous snapshot of its bucket in place until
    /// that snapshot expires.
    pub async fn refresh(&self) -> RecentNews {
        let recent = self.fetcher.fetch_recent_two_days().await;
        self.store(Bucket::Today, &recent.today).await;
        self.store(Bucket::Yesterday, &recent.yesterday).await;
        info!(total = recent.total_articles, "refreshed recent buckets");
        recent
    }

    pub async fn today(&self) -> FetchResult {
        self.cached_or_fetch(Bucket::Today, self.fetcher.fetch_today()).await
    }

    pub async fn yesterday(&self) -> FetchResult {
        self.cached_or_fetch(Bucket::Yesterday, self.fetcher.fetch_yesterday()).await
    }

    /// One page of today's articles followed by yesterday's.
    ///
    /// A page assembled while either day failed to fetch is returned but not
    /// cached.
    pub async fn latest(&self, page: usize, per_page: usize) -> LatestPage {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let bucket = Bucket::Latest { page, per_page };

        match self.storage.get_latest(bucket).await {
            Ok(Some(cached)) => {
                debug!(%bucket, "serving cached page");
                return cached;
            }
            Ok(None) => {}
            Err(e) => warn!(%bucket, error = %e, "failed to read cached page"),
        }

        let today = self.today().await;
        let yesterday = self.yesterday().await;
        let all: Vec<_> = today.stamped_articles().chain(yesterday.stamped_articles()).collect();

        let start = (page - 1).saturating_mul(per_page);
        let latest = LatestPage {
            page,
            per_page,
            total_articles: all.len(),
            articles: all.into_iter().skip(start).take(per_page).collect(),
            last_updated: Utc::now(),
        };

        if !today.is_success() || !yesterday.is_success() {
            debug!(%bucket, "not caching page built from a failed fetch");
            return latest;
        }
        if let Err(e) = self
            .storage
            .put(&bucket.key(), CachedValue::Latest(latest.clone()), self.ttl.ttl_for(bucket))
            .await
        {
            warn!(%bucket, error = %e, "failed to cache page");
        }
        latest
    }

    async fn cached_or_fetch<F>(&self, bucket: Bucket, fetch: F) -> FetchResult
    where
        F: Future<Output = FetchResult>,
    {
        match self.storage.get_fetch(bucket).await {
            Ok(Some(cached)) => {
                debug!(%bucket, "serving cached bucket");
                return cached;
            }
            Ok(None) => {}
            Err(e) => warn!(%bucket, error = %e, "failed to read cached bucket"),
        }

        let result = fetch.await;
        self.store(bucket, &result).await;
        result
    }

    async fn store(&self, bucket: Bucket, result: &FetchResult) {
        if !result.is_success() {
            debug!(%bucket, "not caching failed fetch");
            return;
        }
        let ttl = self.ttl.ttl_for(bucket);
        if let Err(e) = self
            .storage
            .put(&bucket.key(), CachedValue::Fetch(result.clone()), ttl)
            .await
        {
            warn!(%bucket, error = %e, "failed to cache fetch result");
        }
    }
}
