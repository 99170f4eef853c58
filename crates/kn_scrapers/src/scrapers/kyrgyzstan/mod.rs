use std::sync::Arc;
use crate::scrapers::Scraper;

pub mod kaktus;

pub use kaktus::KaktusScraper;

pub const REGION: &str = "kyrgyzstan";

/// Returns all available Kyrgyz news scrapers with their default endpoints
pub fn get_scrapers() -> Vec<Arc<dyn Scraper>> {
    vec![Arc::new(KaktusScraper::default())]
}
