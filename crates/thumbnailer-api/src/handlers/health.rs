//! Liveness probe.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Process is running. The service holds no connections worth probing.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
