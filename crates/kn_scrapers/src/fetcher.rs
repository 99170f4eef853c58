use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use kn_core::{format_date, FetchResult, RecentNews};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use crate::http::HttpClient;
use crate::scrapers::Scraper;

/// UTC offset of Bishkek, where the listing's calendar days begin.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 6;

/// Retrieves one listing page per calendar date and turns it into a [`FetchResult`].
///
/// Every failure is folded into the returned result; nothing here returns an error.
pub struct NewsFetcher {
    client: Arc<dyn HttpClient>,
    scraper: Arc<dyn Scraper>,
    offset: FixedOffset,
}

impl NewsFetcher {
    pub fn new(client: Arc<dyn HttpClient>, scraper: Arc<dyn Scraper>) -> Self {
        Self {
            client,
            scraper,
            offset: default_offset(),
        }
    }

    /// Calendar days are computed in this offset, both for "today" and "yesterday".
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn scraper(&self) -> &Arc<dyn Scraper> {
        &self.scraper
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }

    pub async fn fetch_news(&self, date: NaiveDate) -> FetchResult {
        let is_today = date == self.today();
        self.fetch(date, is_today).await
    }

    pub async fn fetch_today(&self) -> FetchResult {
        self.fetch(self.today(), true).await
    }

    pub async fn fetch_yesterday(&self) -> FetchResult {
        self.fetch(previous_day(self.today()), false).await
    }

    /// Fetches today and yesterday concurrently. One side failing leaves the
    /// other untouched; both are always reported.
    pub async fn fetch_recent_two_days(&self) -> RecentNews {
        let today = self.today();
        let (today_result, yesterday_result) =
            tokio::join!(self.fetch(today, true), self.fetch(previous_day(today), false));
        let recent = RecentNews::new(today_result, yesterday_result);
        info!(
            total = recent.total_articles,
            today_ok = recent.today.is_success(),
            yesterday_ok = recent.yesterday.is_success(),
            "fetched recent news"
        );
        recent
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, date: NaiveDate, is_today: bool) -> FetchResult {
        let meta = self.scraper.source_metadata();
        let url = self.scraper.listing_url(date);

        let response = match self.client.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "listing request failed");
                return FetchResult::failure(date, meta.origin, format!("Request failed: {}", e), None);
            }
        };

        if !response.is_ok() {
            warn!(%url, status = response.status, "listing returned non-success status");
            return FetchResult::failure(
                date,
                meta.origin,
                format!("Failed to fetch news: HTTP status {}", response.status),
                Some(response.status),
            );
        }

        let articles = self.scraper.extract_articles(&response.body, date);
        let label = if is_today {
            self.scraper.extract_date_banner(&response.body)
        } else {
            None
        }
        .unwrap_or_else(|| format_date(date));

        info!(count = articles.len(), %label, "fetched listing");
        FetchResult::success(label, date, articles, meta.origin)
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}
