use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/news", get(handlers::list_news))
        // Older clients still call these.
        .route("/api/filter", get(handlers::list_news))
        .route("/api/status", get(handlers::list_news))
        .route("/api/news/today", get(handlers::today_news))
        .route("/api/news/yesterday", get(handlers::yesterday_news))
        .route("/api/news/latest", get(handlers::latest_news))
        .route("/api/parse", post(handlers::parse_news))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{create_app, AppState};
    pub use kn_core::{ArticleRecord, Error, Result};
}
