//! Role admin screens and actions.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegate_core::models::{Role, RoleInput};
use rolegate_core::store::ensure_deletable;
use rolegate_core::validation::validate_role;
use tracing::{info, warn};

use super::{DeleteResponse, SortQuery, record_id, single_id, sorted};
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::views::roles::{self, INDEX_URL, RoleRow, TITLE};
use crate::views::{Detail, Form, Grid, Page, Screen, page};

/// `GET /auth/roles` — listing grid, optionally `?sort=&order=`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> AppResult<Json<Page<Grid<RoleRow>>>> {
    let records = state.stores.roles.find_all().await?;
    let records = sorted(records, &query, &roles::columns())?;
    Ok(Json(page(TITLE, INDEX_URL, Screen::List, None, roles::grid(&records))))
}

/// `GET /auth/roles/{id}` — detail view.
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Page<Detail>>> {
    let id = record_id(&raw_id)?;
    let record = state.stores.roles.find_or_fail(id).await?;
    Ok(Json(page(TITLE, INDEX_URL, Screen::Detail, Some(id), roles::detail(&record))))
}

/// `GET /auth/roles/create` — empty form with every permission selectable.
pub async fn create_form(State(state): State<AppState>) -> AppResult<Json<Page<Form>>> {
    let permissions = state.stores.permissions.find_all().await?;
    let form = roles::form(None, &permissions, &state.config);
    Ok(Json(page(TITLE, INDEX_URL, Screen::Create, None, form)))
}

/// `GET /auth/roles/{id}/edit` — form filled with the record.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Page<Form>>> {
    let id = record_id(&raw_id)?;
    let record = state.stores.roles.find_or_fail(id).await?;
    let permissions = state.stores.permissions.find_all().await?;
    let form = roles::form(Some(&record), &permissions, &state.config);
    Ok(Json(page(TITLE, INDEX_URL, Screen::Edit, Some(id), form)))
}

/// `POST /auth/roles` — create.
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<RoleInput>,
) -> AppResult<(StatusCode, Json<Role>)> {
    validate_role(&input)?;
    info!(slug = %input.slug, permissions = ?input.permissions, "creating role");
    let record = state.stores.roles.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /auth/roles/{id}` — update, replacing the permission set.
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(input): Json<RoleInput>,
) -> AppResult<Json<Role>> {
    let id = record_id(&raw_id)?;
    validate_role(&input)?;
    info!(role_id = id, slug = %input.slug, permissions = ?input.permissions, "updating role");
    let record = state.stores.roles.update(id, input).await?;
    Ok(Json(record))
}

/// `DELETE /auth/roles/{id}` — delete one role. The administrator role is refused.
pub async fn destroy(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let id = single_id(&raw_id)?;
    let record = state.stores.roles.find_or_fail(id).await?;
    if let Err(e) = ensure_deletable(&record) {
        warn!(role_id = id, slug = %record.slug, "refusing to delete protected role");
        return Err(e.into());
    }
    info!(role_id = id, slug = %record.slug, "deleting role");
    if !state.stores.roles.delete(id).await? {
        return Err(AppError::NotFound(format!("Role {id} not found")));
    }
    Ok(Json(DeleteResponse::succeeded()))
}
