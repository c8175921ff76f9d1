//! Request handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{info, warn};

use super::AppState;
use crate::schema::CrawlRequest;

/// `POST /api/v1/crawl`
///
/// Malformed or invalid requests are refused before admission; anything
/// that reaches the pipeline answers 200 with the response contract.
pub async fn crawl(
    State(state): State<AppState>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejected crawl request: {}", rejection.body_text());
            return detail(rejection.status(), rejection.body_text());
        }
    };

    if let Err(e) = request.validate() {
        warn!(url = %request.url, "Invalid crawl request: {e}");
        return detail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
    }

    info!(url = %request.url, "Crawl requested");
    Json(state.service.crawl(request).await).into_response()
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let gate = state.service.gate();
    Json(json!({
        "status": "ok",
        "in_flight": gate.in_flight(),
        "capacity": gate.capacity(),
    }))
}

fn detail(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}
