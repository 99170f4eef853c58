use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use kn_core::{ArticleRecord, CachedValue, Error, FetchResult, Result, ResultStorage};
use kn_scrapers::{HttpClient, HttpResponse, KaktusScraper, NewsFetcher, NewsManager};
use kn_storage::{MemoryStorage, TtlPolicy};
use kn_web::{create_app, AppState};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const LISTING: &str = r#"
    <span class="PaginatorDate--today-text">Сегодня</span>
    <div class="Tag--articles">
        <div class="Tag--article">
            <a class="ArticleItem--name" href="/doc/1">Breaking NEWS Today</a>
            <div class="ArticleItem--time">09:00</div>
        </div>
        <div class="Tag--article">
            <a class="ArticleItem--name" href="/doc/2">Weather report</a>
            <div class="ArticleItem--time">08:00</div>
        </div>
    </div>
"#;

struct FixedClient {
    status: Option<u16>,
}

#[async_trait]
impl HttpClient for FixedClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        match self.status {
            Some(status) => Ok(HttpResponse {
                status,
                body: LISTING.to_string(),
            }),
            None => Err(Error::Scraping(format!("timed out: {}", url))),
        }
    }
}

async fn app(status: Option<u16>) -> (Router, MemoryStorage) {
    let storage = MemoryStorage::new();
    let fetcher = NewsFetcher::new(
        Arc::new(FixedClient { status }),
        Arc::new(KaktusScraper::default()),
    );
    let manager = NewsManager::new(fetcher, Arc::new(storage.clone()), TtlPolicy::default());
    (create_app(AppState::new(Arc::new(manager))).await, storage)
}

async fn call(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri).await
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn bucket(date: NaiveDate, titles: &[&str]) -> CachedValue {
    let articles = titles
        .iter()
        .enumerate()
        .map(|(i, title)| ArticleRecord {
            title: title.to_string(),
            url: format!("/doc/{}", i),
            published_time: "12:00".to_string(),
            source: "Kaktus Media".to_string(),
            date: String::new(),
        })
        .collect();
    CachedValue::Fetch(FetchResult::success(
        date.format("%Y-%m-%d").to_string(),
        date,
        articles,
        "kaktus.media",
    ))
}

async fn seed(storage: &MemoryStorage) {
    let ttl = Duration::from_secs(60);
    storage
        .put("today", bucket(day(6), &["Breaking NEWS Today", "Sports"]), ttl)
        .await
        .unwrap();
    storage
        .put("yesterday", bucket(day(5), &["Old news", "Markets"]), ttl)
        .await
        .unwrap();
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn empty_cache_lists_nothing() {
    let (app, _storage) = app(Some(200)).await;
    let (status, body) = get(app, "/api/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}

#[tokio::test]
async fn filters_cached_articles() {
    let (app, storage) = app(Some(200)).await;
    seed(&storage).await;

    let (_, body) = get(app.clone(), "/api/news").await;
    assert_eq!(titles(&body), vec!["Breaking NEWS Today", "Sports", "Old news", "Markets"]);
    assert_eq!(body[0]["date"], "2024-01-06");
    assert_eq!(body[0]["time"], "12:00");

    let (_, body) = get(app.clone(), "/api/news?title=news").await;
    assert_eq!(titles(&body), vec!["Breaking NEWS Today", "Old news"]);

    let (_, body) = get(app.clone(), "/api/filter?date=2024-01-05").await;
    assert_eq!(titles(&body), vec!["Old news", "Markets"]);

    let (_, body) = get(app.clone(), "/api/status?date_after=2024-01-06&source=kaktus").await;
    assert_eq!(titles(&body), vec!["Breaking NEWS Today", "Sports"]);

    let (_, body) = get(app, "/api/news?page=2&per_page=3").await;
    assert_eq!(titles(&body), vec!["Markets"]);
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let (app, _storage) = app(Some(200)).await;
    let (status, body) = get(app, "/api/news?date_before=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date_before"));

    let (status, _) = get(self::app(Some(200)).await.0, "/api/news?date=2024-1-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn filtering_never_fetches() {
    let (app, storage) = app(Some(200)).await;
    let (_, body) = get(app, "/api/news").await;
    assert_eq!(body, Value::Array(vec![]));
    assert!(storage.is_empty().await);
}

#[tokio::test]
async fn today_fetches_on_miss_and_caches() {
    let (app, storage) = app(Some(200)).await;
    let (status, body) = get(app.clone(), "/api/news/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "Сегодня");
    assert_eq!(body["articles"].as_array().unwrap().len(), 2);
    assert_eq!(body["source"], "kaktus.media");
    assert!(body.get("error").is_none());
    assert!(!storage.is_empty().await);

    let (_, body) = get(app, "/api/news?title=weather").await;
    assert_eq!(titles(&body), vec!["Weather report"]);
}

#[tokio::test]
async fn failed_upstream_is_reported() {
    let (app, storage) = app(Some(503)).await;
    let (status, body) = get(app.clone(), "/api/news/yesterday").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], 503);
    assert!(body["articles"].as_array().unwrap().is_empty());
    assert!(storage.is_empty().await);

    let (app, _storage) = self::app(None).await;
    let (status, body) = get(app, "/api/news/today").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("timed out"));
}

#[tokio::test]
async fn parse_refreshes_both_buckets() {
    let (app, _storage) = app(Some(200)).await;
    let (status, body) = call(app.clone(), Method::POST, "/api/parse").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_articles"], 4);
    assert_eq!(body["today"]["articles"].as_array().unwrap().len(), 2);
    assert_eq!(body["yesterday"]["articles"].as_array().unwrap().len(), 2);

    let (_, body) = get(app, "/api/news?title=breaking").await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn latest_pages() {
    let (app, storage) = app(Some(200)).await;
    seed(&storage).await;

    let (status, body) = get(app.clone(), "/api/news/latest?page=1&per_page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 3);
    assert_eq!(body["total_articles"], 4);
    assert_eq!(body["articles"].as_array().unwrap().len(), 3);

    let (_, body) = get(app, "/api/news/latest").await;
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["articles"].as_array().unwrap().len(), 4);
    assert!(storage.get("latest_1_10").await.unwrap().is_some());
}
