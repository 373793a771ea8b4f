//! Liveness and readiness probes. These sit outside `/api/v1` and the rate limiter.

use axum::{extract::State, http::StatusCode, Json};
use politalk_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
///
/// 503 until both PostgreSQL and Redis answer.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let deps = state.check_dependencies().await;
    let response = ReadinessResponse::ready(deps.database, deps.redis);

    if !response.is_ready() {
        tracing::warn!(database = deps.database, redis = deps.redis, "Not ready");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(response));
    }
    (StatusCode::OK, Json(response))
}
