use axum::Json;

use crate::dto::HealthResponse;

/// Health check handler - GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
