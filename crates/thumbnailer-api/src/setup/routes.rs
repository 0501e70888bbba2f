//! Router and middleware stack

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use thumbnailer_infra::request_id_middleware;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::constants::MAX_EVENT_BODY_BYTES;
use crate::handlers::{events, health};
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router {
    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    Router::new()
        .route("/", post(events::receive_event))
        .route("/events", post(events::receive_event))
        .route("/health", get(health::liveness_check))
        .route("/health/live", get(health::liveness_check))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_EVENT_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}
