//! Health Check Handler
//!
//! Liveness endpoint for container health checks. Reachable without a session.

use axum::{Json, http::StatusCode, response::IntoResponse};

/// GET /healthz
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
