//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub version: &'static str,
    pub store_connected: bool,
}

/// `GET /health` — reports the core version and whether the store answers.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = match state.stores.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("store ping failed: {e}");
            false
        }
    };
    Json(HealthResponse {
        version: rolegate_core::version(),
        store_connected,
    })
}
