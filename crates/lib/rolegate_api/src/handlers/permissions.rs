//! Permission admin screens and actions.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegate_core::models::{Permission, PermissionInput};
use rolegate_core::validation::validate_permission;
use tracing::info;

use super::{DeleteResponse, SortQuery, record_id, single_id, sorted};
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::views::permissions::{self, INDEX_URL, PermissionRow, TITLE};
use crate::views::{Detail, Form, Grid, Page, Screen, page};

/// `GET /auth/permissions` — listing grid, optionally `?sort=&order=`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SortQuery>,
) -> AppResult<Json<Page<Grid<PermissionRow>>>> {
    let records = state.stores.permissions.find_all().await?;
    let records = sorted(records, &query, &permissions::columns())?;
    let grid = permissions::grid(&records, &state.config);
    Ok(Json(page(TITLE, INDEX_URL, Screen::List, None, grid)))
}

/// `GET /auth/permissions/{id}` — detail view.
pub async fn show(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Page<Detail>>> {
    let id = record_id(&raw_id)?;
    let record = state.stores.permissions.find_or_fail(id).await?;
    let detail = permissions::detail(&record, &state.config);
    Ok(Json(page(TITLE, INDEX_URL, Screen::Detail, Some(id), detail)))
}

/// `GET /auth/permissions/create` — empty form.
pub async fn create_form(State(state): State<AppState>) -> Json<Page<Form>> {
    let form = permissions::form(None, &state.config);
    Json(page(TITLE, INDEX_URL, Screen::Create, None, form))
}

/// `GET /auth/permissions/{id}/edit` — form filled with the record.
pub async fn edit_form(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<Page<Form>>> {
    let id = record_id(&raw_id)?;
    let record = state.stores.permissions.find_or_fail(id).await?;
    let form = permissions::form(Some(&record), &state.config);
    Ok(Json(page(TITLE, INDEX_URL, Screen::Edit, Some(id), form)))
}

/// `POST /auth/permissions` — create.
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<PermissionInput>,
) -> AppResult<(StatusCode, Json<Permission>)> {
    validate_permission(&input)?;
    info!(slug = %input.slug, "creating permission");
    let record = state.stores.permissions.create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /auth/permissions/{id}` — update.
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(input): Json<PermissionInput>,
) -> AppResult<Json<Permission>> {
    let id = record_id(&raw_id)?;
    validate_permission(&input)?;
    info!(permission_id = id, slug = %input.slug, "updating permission");
    let record = state.stores.permissions.update(id, input).await?;
    Ok(Json(record))
}

/// `DELETE /auth/permissions/{id}` — delete one permission.
pub async fn destroy(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    let id = single_id(&raw_id)?;
    info!(permission_id = id, "deleting permission");
    if !state.stores.permissions.delete(id).await? {
        return Err(AppError::NotFound(format!("Permission {id} not found")));
    }
    Ok(Json(DeleteResponse::succeeded()))
}
