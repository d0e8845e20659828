//! `/api/health`, `/api/ready`, `/api/live`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthBody {
    alive: bool,
    version: String,
    status: String,
}

/// Proxies the Agent Service's own `HealthCheck`: the Gateway is only
/// healthy if the component it dispatches to is reachable.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthBody>) {
    match state.agent.health_check().await {
        Ok(resp) => (
            StatusCode::OK,
            Json(HealthBody { alive: resp.alive, version: resp.version, status: resp.status }),
        ),
        Err(error) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthBody { alive: false, version: env!("CARGO_PKG_VERSION").to_string(), status: error.to_string() }),
        ),
    }
}

/// Readiness: the Gateway is ready to accept chat traffic once the Agent
/// Service answers a health check. Does not inspect session state.
pub async fn ready(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.agent.health_check().await.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Liveness: the process itself is up, independent of downstream health.
pub async fn live() -> StatusCode {
    StatusCode::OK
}
