use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used for request targets, bucket stamps and filter criteria.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One news item as listed on a source page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    /// Time label exactly as the source page shows it, e.g. `"14:05"`.
    #[serde(rename = "time", alias = "publishedTime")]
    pub published_time: String,
    pub source: String,
    /// Calendar bucket the record was fetched under, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
}

impl ArticleRecord {
    /// Parses the bucket date. Returns `None` for anything that is not strict `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date).ok()
    }
}

/// Outcome of a single date-scoped fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    /// Either the formatted request date or the page's own "today" label.
    pub date: String,
    pub requested_date: NaiveDate,
    pub articles: Vec<ArticleRecord>,
    pub source: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl FetchResult {
    pub fn success(
        date: String,
        requested_date: NaiveDate,
        articles: Vec<ArticleRecord>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date,
            requested_date,
            articles,
            source: source.into(),
            last_updated: Utc::now(),
            error: None,
            status: None,
        }
    }

    /// A failed fetch: no articles, `error` describes what went wrong.
    pub fn failure(
        requested_date: NaiveDate,
        source: impl Into<String>,
        error: impl Into<String>,
        status: Option<u16>,
    ) -> Self {
        Self {
            date: format_date(requested_date),
            requested_date,
            articles: Vec::new(),
            source: source.into(),
            last_updated: Utc::now(),
            error: Some(error.into()),
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Articles stamped with the calendar date this result was fetched for.
    pub fn stamped_articles(&self) -> impl Iterator<Item = ArticleRecord> + '_ {
        let date = format_date(self.requested_date);
        self.articles.iter().map(move |article| ArticleRecord {
            date: date.clone(),
            ..article.clone()
        })
    }
}

/// Both recent buckets fetched together. Owned by the caller, never global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentNews {
    pub total_articles: usize,
    pub today: FetchResult,
    pub yesterday: FetchResult,
    pub last_updated: DateTime<Utc>,
}

impl RecentNews {
    pub fn new(today: FetchResult, yesterday: FetchResult) -> Self {
        Self {
            total_articles: today.articles.len() + yesterday.articles.len(),
            today,
            yesterday,
            last_updated: Utc::now(),
        }
    }
}

/// One page of the combined today + yesterday listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestPage {
    pub page: usize,
    pub per_page: usize,
    pub total_articles: usize,
    pub articles: Vec<ArticleRecord>,
    pub last_updated: DateTime<Utc>,
}

/// Named cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Today,
    Yesterday,
    Latest { page: usize, per_page: usize },
}

impl Bucket {
    pub fn key(&self) -> String {
        match self {
            Bucket::Today => "today".to_string(),
            Bucket::Yesterday => "yesterday".to_string(),
            Bucket::Latest { page, per_page } => format!("latest_{}_{}", page, per_page),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Request-derived predicate set. Every present criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_after: Option<NaiveDate>,
    pub date_before: Option<NaiveDate>,
    pub source: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses strict `YYYY-MM-DD`: zero-padded, no sign, no surrounding whitespace.
pub fn parse_date(value: &str) -> crate::Result<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(crate::Error::InvalidDate(format!("{:?}: expected YYYY-MM-DD", value)));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| crate::Error::InvalidDate(format!("{:?}: {}", value, e)))
}
