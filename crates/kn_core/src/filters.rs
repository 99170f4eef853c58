use tracing::{debug, warn};
use crate::storage::ResultStorage;
use crate::types::{ArticleRecord, Bucket, FilterCriteria};

/// Flattens the cached `today` and `yesterday` buckets into one collection.
///
/// Every article is stamped with the calendar date its bucket was fetched for.
/// A missing bucket contributes nothing; so does a storage failure, which is
/// logged rather than surfaced.
pub async fn cached_articles(storage: &dyn ResultStorage) -> Vec<ArticleRecord> {
    let mut articles = Vec::new();
    for bucket in [Bucket::Today, Bucket::Yesterday] {
        match storage.get_fetch(bucket).await {
            Ok(Some(result)) => articles.extend(result.stamped_articles()),
            Ok(None) => debug!(%bucket, "cache miss"),
            Err(e) => warn!(%bucket, error = %e, "failed to read cached bucket"),
        }
    }
    articles
}

/// Returns the articles matching every present criterion, in input order.
pub fn apply_filters(articles: &[ArticleRecord], criteria: &FilterCriteria) -> Vec<ArticleRecord> {
    let title = criteria.title.as_deref().map(str::to_lowercase);
    let source = criteria.source.as_deref().map(str::to_lowercase);
    let dated = criteria.date.is_some() || criteria.date_after.is_some() || criteria.date_before.is_some();

    articles
        .iter()
        .filter(|article| {
            title
                .as_ref()
                .map_or(true, |t| article.title.to_lowercase().contains(t))
        })
        .filter(|article| {
            source
                .as_ref()
                .map_or(true, |s| article.source.to_lowercase().contains(s))
        })
        .filter(|article| {
            if !dated {
                return true;
            }
            // Unparseable dates never satisfy a date criterion.
            let Some(date) = article.calendar_date() else {
                return false;
            };
            criteria.date.map_or(true, |d| date == d)
                && criteria.date_after.map_or(true, |d| date >= d)
                && criteria.date_before.map_or(true, |d| date <= d)
        })
        .cloned()
        .collect()
}
