pub mod error;
pub mod filters;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use filters::{apply_filters, cached_articles};
pub use storage::{CachedValue, ResultStorage};
pub use types::{
    format_date, parse_date, ArticleRecord, Bucket, FetchResult, FilterCriteria, LatestPage,
    RecentNews, DATE_FORMAT,
};
