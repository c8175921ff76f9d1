//! HTTP surface of the crawl service

pub mod routes;

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::service::CrawlService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CrawlService>,
}

/// Router exposing the crawl and health endpoints
pub fn router(service: Arc<CrawlService>) -> Router {
    Router::new()
        .route("/api/v1/crawl", post(routes::crawl))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}
