//! Permission grid, detail and form views.

use rolegate_core::display::format_timestamp;
use rolegate_core::models::{HttpMethod, Permission};
use rolegate_core::rules;
use serde::Serialize;
use serde_json::json;

use super::{
    BatchActions, Column, Detail, DetailField, FieldKind, Form, FormField, Grid, GridRow,
    RowActions, SelectOption,
};
use crate::config::ApiConfig;

pub const TITLE: &str = "Permissions";
pub const INDEX_URL: &str = "auth/permissions";

/// Route rules of a permission as badge markup, prefixed for display.
pub fn route_markup(permission: &Permission, route_prefix: &str) -> String {
    rules::render(&permission.rules(), route_prefix)
}

/// One listing row.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionRow {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub http_path: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PermissionRow {
    pub fn from_record(permission: &Permission, route_prefix: &str) -> Self {
        Self {
            id: permission.id,
            slug: permission.slug.clone(),
            name: permission.name.clone(),
            http_path: route_markup(permission, route_prefix),
            created_at: format_timestamp(permission.created_at.as_ref()),
            updated_at: format_timestamp(permission.updated_at.as_ref()),
        }
    }
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::sortable("id", "ID"),
        Column::new("slug", "Slug"),
        Column::new("name", "Name"),
        Column::new("http_path", "Route"),
        Column::sortable("created_at", "Created at"),
        Column::sortable("updated_at", "Updated at"),
    ]
}

pub fn grid(permissions: &[Permission], config: &ApiConfig) -> Grid<PermissionRow> {
    Grid {
        columns: columns(),
        rows: permissions
            .iter()
            .map(|p| GridRow {
                record: PermissionRow::from_record(p, &config.route_prefix),
                actions: RowActions::all(),
            })
            .collect(),
        batch_actions: BatchActions::without_delete(),
    }
}

pub fn detail(permission: &Permission, config: &ApiConfig) -> Detail {
    Detail {
        fields: vec![
            DetailField::new("id", "ID", permission.id),
            DetailField::new("slug", "Slug", permission.slug.clone()),
            DetailField::new("name", "Name", permission.name.clone()),
            DetailField::new(
                "http_path",
                "Route",
                route_markup(permission, &config.route_prefix),
            ),
            DetailField::new(
                "created_at",
                "Created at",
                format_timestamp(permission.created_at.as_ref()),
            ),
            DetailField::new(
                "updated_at",
                "Updated at",
                format_timestamp(permission.updated_at.as_ref()),
            ),
        ],
    }
}

/// Options of the HTTP method multi-select.
pub fn method_options() -> Vec<SelectOption> {
    HttpMethod::ALL
        .iter()
        .map(|m| SelectOption {
            value: json!(m.as_str()),
            label: m.as_str().to_string(),
        })
        .collect()
}

/// Create form when `existing` is `None`, edit form otherwise.
pub fn form(existing: Option<&Permission>, config: &ApiConfig) -> Form {
    let (action, method) = match existing {
        Some(p) => (config.admin_url(&format!("/{INDEX_URL}/{}", p.id)), "PUT"),
        None => (config.admin_url(&format!("/{INDEX_URL}")), "POST"),
    };

    let mut id = FormField::new(FieldKind::Display, "id", "ID");
    let mut slug = FormField::new(FieldKind::Text, "slug", "Slug").required();
    let mut name = FormField::new(FieldKind::Text, "name", "Name").required();
    let mut http_method = FormField::new(FieldKind::MultipleSelect, "http_method", "HTTP method")
        .options(method_options())
        .help("All methods if empty");
    let mut http_path = FormField::new(FieldKind::Textarea, "http_path", "HTTP path");
    let mut created_at = FormField::new(FieldKind::Display, "created_at", "Created at");
    let mut updated_at = FormField::new(FieldKind::Display, "updated_at", "Updated at");

    if let Some(p) = existing {
        id = id.value(p.id);
        slug = slug.value(p.slug.clone());
        name = name.value(p.name.clone());
        http_method = http_method.value(json!(p.http_method));
        http_path = http_path.value(p.http_path.clone());
        created_at = created_at.value(format_timestamp(p.created_at.as_ref()));
        updated_at = updated_at.value(format_timestamp(p.updated_at.as_ref()));
    }

    Form {
        action,
        method,
        fields: vec![id, slug, name, http_method, http_path, created_at, updated_at],
    }
}
