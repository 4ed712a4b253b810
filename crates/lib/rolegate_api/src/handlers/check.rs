//! Authorization query endpoint.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AppState;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Role slugs held by the principal. Unknown slugs are ignored.
    pub roles: Vec<String>,
    pub method: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
    /// Slugs that resolved to stored roles.
    pub matched_roles: Vec<String>,
}

/// `POST /auth/check` — may these roles call `method path`?
pub async fn check_access(
    State(state): State<AppState>,
    Json(body): Json<CheckRequest>,
) -> AppResult<Json<CheckResponse>> {
    if body.method.trim().is_empty() {
        return Err(AppError::BadRequest("method is required".into()));
    }
    let roles = state.stores.roles.find_by_slugs(&body.roles).await?;
    let allowed = state.checker.allows(&roles, &body.method, &body.path);
    debug!(method = %body.method, path = %body.path, allowed, "access check");
    Ok(Json(CheckResponse {
        allowed,
        matched_roles: roles.into_iter().map(|r| r.slug).collect(),
    }))
}
