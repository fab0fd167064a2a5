use crate::AppState;
use axum::{extract::State, Json};
use consign_database::TenantRegistryStats;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub tenants: TenantRegistryStats,
}

/// Liveness probe; touches no database
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tenants: state.registry.stats(),
    })
}
