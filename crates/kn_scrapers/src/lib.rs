pub mod cli;
pub mod fetcher;
pub mod http;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use fetcher::NewsFetcher;
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use manager::NewsManager;
pub use scrapers::{KaktusScraper, Scraper};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use super::{HttpClient, NewsFetcher, NewsManager};
    pub use kn_core::{ArticleRecord, Error, FetchResult, Result};
}
