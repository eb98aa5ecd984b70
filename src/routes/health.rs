use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub record_service: String,
}

/// Health check endpoint - public
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = state.records.health_check().await;

    if let Err(e) = &reachable {
        tracing::warn!(error = %e, "Record service health check failed");
    }

    // Local state is still readable without the record service
    let (status, record_service) = match reachable {
        Ok(()) => ("healthy", "ok"),
        Err(_) => ("degraded", "error"),
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            record_service: record_service.to_string(),
        }),
    )
}
