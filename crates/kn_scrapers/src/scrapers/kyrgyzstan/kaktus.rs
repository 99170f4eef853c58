use chrono::NaiveDate;
use kn_core::{format_date, ArticleRecord, Error, Result};
use url::Url;
use crate::scrapers::listing::{self, ListingLayout};
use crate::scrapers::{Scraper, SourceMetadata};
use super::REGION;

const LAYOUT: ListingLayout = ListingLayout {
    group: "div.Tag--articles",
    item: "div.Tag--article",
    link: "a.ArticleItem--name",
    time: ".ArticleItem--time",
    banner: "span.PaginatorDate--today-text",
};

/// Kaktus Media date listings.
#[derive(Debug, Clone)]
pub struct KaktusScraper {
    base: String,
    origin: String,
}

impl KaktusScraper {
    pub const BASE_URL: &'static str = "https://kaktus.media";
    pub const NAME: &'static str = "Kaktus Media";

    /// Points the scraper at another host serving the same listing, e.g. a mirror.
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)?;
        let origin = url
            .host_str()
            .ok_or_else(|| Error::Config(format!("Base URL has no host: {}", base_url)))?
            .to_string();
        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            origin,
        })
    }
}

impl Default for KaktusScraper {
    fn default() -> Self {
        Self {
            base: Self::BASE_URL.to_string(),
            origin: "kaktus.media".to_string(),
        }
    }
}

impl Scraper for KaktusScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: Self::NAME,
            origin: self.origin.clone(),
            emoji: "🌵",
            region: REGION,
        }
    }

    // `lable` is the site's own parameter name.
    fn listing_url(&self, date: NaiveDate) -> String {
        format!("{}/?lable=8&date={}&order=time", self.base, format_date(date))
    }

    fn extract_articles(&self, html: &str, date: NaiveDate) -> Vec<ArticleRecord> {
        listing::extract_articles(html, &LAYOUT, Self::NAME, &format_date(date))
    }

    fn extract_date_banner(&self, html: &str) -> Option<String> {
        listing::extract_date_banner(html, &LAYOUT)
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["kaktus", "kaktus.media"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <div class="PaginatorDate">
            <span class="PaginatorDate--today-text">19  октября  2024</span>
        </div>
        <div class="Tag--articles">
            <div class="Tag--article">
                <a class="ArticleItem--name" href="https://kaktus.media/doc/1">  Первая новость </a>
                <div class="ArticleItem--time">14:05</div>
            </div>
            <div class="Tag--article">
                <a class="ArticleItem--name" href="https://kaktus.media/doc/2">Без времени</a>
            </div>
            <div class="Tag--article">
                <div class="ArticleItem--time">13:00</div>
            </div>
            <div class="Tag--article">
                <a class="ArticleItem--name" href="/doc/4">Вторая новость</a>
                <div class="ArticleItem--time">12:40</div>
            </div>
        </div>
        </body></html>
    "#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 19).unwrap()
    }

    #[test]
    fn test_listing_url() {
        let scraper = KaktusScraper::default();
        assert_eq!(
            scraper.listing_url(date()),
            "https://kaktus.media/?lable=8&date=2024-10-19&order=time"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let scraper = KaktusScraper::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(
            scraper.listing_url(date()),
            "http://127.0.0.1:8080/?lable=8&date=2024-10-19&order=time"
        );
        assert_eq!(scraper.source_metadata().origin, "127.0.0.1");
        assert!(KaktusScraper::new("not a url").is_err());
    }

    #[test]
    fn test_skips_malformed_items_and_keeps_order() {
        let scraper = KaktusScraper::default();
        let articles = scraper.extract_articles(LISTING, date());
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Первая новость");
        assert_eq!(articles[0].url, "https://kaktus.media/doc/1");
        assert_eq!(articles[0].published_time, "14:05");
        assert_eq!(articles[0].source, "Kaktus Media");
        assert_eq!(articles[0].date, "2024-10-19");
        assert_eq!(articles[1].title, "Вторая новость");
        assert_eq!(articles[1].url, "/doc/4");
    }

    #[test]
    fn test_no_sections() {
        let scraper = KaktusScraper::default();
        assert!(scraper.extract_articles("<html><body><p>Пусто</p></body></html>", date()).is_empty());
    }

    #[test]
    fn test_date_banner() {
        let scraper = KaktusScraper::default();
        assert_eq!(scraper.extract_date_banner(LISTING).as_deref(), Some("19 октября 2024"));
    }
}
