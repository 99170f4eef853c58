use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use kn_core::{apply_filters, cached_articles, parse_date, ArticleRecord, FetchResult, FilterCriteria};
use kn_scrapers::manager::MAX_PER_PAGE;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    pub title: Option<String>,
    pub date: Option<String>,
    pub date_after: Option<String>,
    pub date_before: Option<String>,
    pub source: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl NewsQuery {
    pub fn criteria(&self) -> Result<FilterCriteria, ApiError> {
        Ok(FilterCriteria {
            title: non_empty(&self.title),
            date: date_param("date", &self.date)?,
            date_after: date_param("date_after", &self.date_after)?,
            date_before: date_param("date_before", &self.date_before)?,
            source: non_empty(&self.source),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn date_param(name: &'static str, value: &Option<String>) -> Result<Option<chrono::NaiveDate>, ApiError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(parse_date)
        .transpose()
        .map_err(|e| ApiError::InvalidQuery {
            name,
            reason: e.to_string(),
        })
}

/// GET /api/news: filtered view over the cached today and yesterday buckets.
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<ArticleRecord>>, ApiError> {
    let criteria = query.criteria()?;
    let storage = state.storage();
    let articles = cached_articles(storage.as_ref()).await;
    let mut filtered = apply_filters(&articles, &criteria);
    debug!(total = articles.len(), matched = filtered.len(), ?criteria, "filtered news");

    if query.page.is_some() || query.per_page.is_some() {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        filtered = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
    }
    Ok(Json(filtered))
}

/// GET /api/news/today
pub async fn today_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    fetch_response(state.manager.today().await)
}

/// GET /api/news/yesterday
pub async fn yesterday_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    fetch_response(state.manager.yesterday().await)
}

fn fetch_response(result: FetchResult) -> impl IntoResponse {
    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(result))
}

/// GET /api/news/latest
pub async fn latest_news(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    Json(state.manager.latest(page, per_page).await)
}

/// POST /api/parse: refreshes both recent buckets.
pub async fn parse_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.manager.refresh().await)
}
