use chrono::NaiveDate;
use kn_core::ArticleRecord;

pub mod kyrgyzstan;
pub mod listing;

pub use kyrgyzstan::KaktusScraper;
pub use listing::{extract_articles, extract_date_banner, ListingLayout};

#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Label stamped on every record, e.g. `"Kaktus Media"`.
    pub name: &'static str,
    /// Origin identifier reported on fetch results, e.g. `"kaktus.media"`.
    pub origin: String,
    pub emoji: &'static str,
    pub region: &'static str,
}

/// A news source that publishes one listing page per calendar date.
///
/// Implementations are pure: they know where the listing for a date lives and
/// how to read it, the fetcher does the I/O.
pub trait Scraper: Send + Sync {
    fn source_metadata(&self) -> SourceMetadata;

    /// Request target for the listing of `date`.
    fn listing_url(&self, date: NaiveDate) -> String;

    fn extract_articles(&self, html: &str, date: NaiveDate) -> Vec<ArticleRecord>;

    /// The page's own label for "today", if it shows one.
    fn extract_date_banner(&self, html: &str) -> Option<String>;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use kn_core::{Error, Result};
    use scraper::{ElementRef, Selector};

    pub fn selector(css: &str) -> Result<Selector> {
        Selector::parse(css).map_err(|e| Error::Scraping(format!("Invalid selector {:?}: {:?}", css, e)))
    }

    pub fn element_text(element: &ElementRef<'_>) -> String {
        collapse_whitespace(&element.text().collect::<String>())
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::utils;
    use scraper::Html;

    #[test]
    fn test_selector() {
        assert!(utils::selector(".Tag--article").is_ok());
        assert!(utils::selector("[[[").is_err());
    }

    #[test]
    fn test_element_text() {
        let document = Html::parse_fragment("<a>  Breaking \n <b>news</b>  </a>");
        let anchor = document.select(&utils::selector("a").unwrap()).next().unwrap();
        assert_eq!(utils::element_text(&anchor), "Breaking news");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(utils::collapse_whitespace("  a  b\t\tc \n"), "a b c");
        assert_eq!(utils::collapse_whitespace("   "), "");
    }
}
