//! Role grid, detail and form views.

use rolegate_core::display::format_timestamp;
use rolegate_core::models::{Permission, Role};
use serde::Serialize;
use serde_json::json;

use super::{
    BatchActions, Column, Detail, DetailField, FieldKind, Form, FormField, Grid, GridRow,
    RowActions, SelectOption,
};
use crate::config::ApiConfig;

pub const TITLE: &str = "Roles";
pub const INDEX_URL: &str = "auth/roles";

#[derive(Debug, Clone, Serialize)]
pub struct RoleRow {
    pub id: i64,
    pub slug: String,
    pub name: String,
    /// Permission names, shown as labels.
    pub permissions: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl RoleRow {
    pub fn from_record(role: &Role) -> Self {
        Self {
            id: role.id,
            slug: role.slug.clone(),
            name: role.name.clone(),
            permissions: role.permission_names().into_iter().map(String::from).collect(),
            created_at: format_timestamp(role.created_at.as_ref()),
            updated_at: format_timestamp(role.updated_at.as_ref()),
        }
    }
}

/// Row actions; delete is withheld from the administrator role.
pub fn row_actions(role: &Role) -> RowActions {
    RowActions {
        delete: role.is_deletable(),
        ..RowActions::all()
    }
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::sortable("id", "ID"),
        Column::new("slug", "Slug"),
        Column::new("name", "Name"),
        Column::new("permissions", "Permission"),
        Column::sortable("created_at", "Created at"),
        Column::sortable("updated_at", "Updated at"),
    ]
}

pub fn grid(roles: &[Role]) -> Grid<RoleRow> {
    Grid {
        columns: columns(),
        rows: roles
            .iter()
            .map(|r| GridRow {
                record: RoleRow::from_record(r),
                actions: row_actions(r),
            })
            .collect(),
        batch_actions: BatchActions::without_delete(),
    }
}

pub fn detail(role: &Role) -> Detail {
    Detail {
        fields: vec![
            DetailField::new("id", "ID", role.id),
            DetailField::new("slug", "Slug", role.slug.clone()),
            DetailField::new("name", "Name", role.name.clone()),
            DetailField::new("permissions", "Permissions", json!(role.permission_names())),
            DetailField::new(
                "created_at",
                "Created at",
                format_timestamp(role.created_at.as_ref()),
            ),
            DetailField::new(
                "updated_at",
                "Updated at",
                format_timestamp(role.updated_at.as_ref()),
            ),
        ],
    }
}

/// Listbox options: every permission, keyed by id.
pub fn permission_options(permissions: &[Permission]) -> Vec<SelectOption> {
    permissions
        .iter()
        .map(|p| SelectOption {
            value: json!(p.id),
            label: p.name.clone(),
        })
        .collect()
}

/// Create form when `existing` is `None`, edit form otherwise.
pub fn form(existing: Option<&Role>, permissions: &[Permission], config: &ApiConfig) -> Form {
    let (action, method) = match existing {
        Some(r) => (config.admin_url(&format!("/{INDEX_URL}/{}", r.id)), "PUT"),
        None => (config.admin_url(&format!("/{INDEX_URL}")), "POST"),
    };

    let mut id = FormField::new(FieldKind::Display, "id", "ID");
    let mut slug = FormField::new(FieldKind::Text, "slug", "Slug").required();
    let mut name = FormField::new(FieldKind::Text, "name", "Name").required();
    let mut selected = FormField::new(FieldKind::Listbox, "permissions", "Permissions")
        .options(permission_options(permissions));
    let mut created_at = FormField::new(FieldKind::Display, "created_at", "Created at");
    let mut updated_at = FormField::new(FieldKind::Display, "updated_at", "Updated at");

    if let Some(r) = existing {
        id = id.value(r.id);
        slug = slug.value(r.slug.clone());
        name = name.value(r.name.clone());
        selected = selected.value(json!(r.permission_ids()));
        created_at = created_at.value(format_timestamp(r.created_at.as_ref()));
        updated_at = updated_at.value(format_timestamp(r.updated_at.as_ref()));
    }

    Form {
        action,
        method,
        fields: vec![id, slug, name, selected, created_at, updated_at],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_core::models::ADMINISTRATOR_SLUG;

    fn role(id: i64, slug: &str) -> Role {
        Role {
            id,
            slug: slug.into(),
            name: slug.into(),
            permissions: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn administrator_row_cannot_be_deleted() {
        let grid = grid(&[role(1, ADMINISTRATOR_SLUG), role(2, "editor")]);
        assert!(!grid.rows[0].actions.delete);
        assert!(grid.rows[0].actions.edit);
        assert!(grid.rows[1].actions.delete);
        assert!(!grid.batch_actions.delete);
    }

    #[test]
    fn form_lists_all_permissions() {
        let permissions = vec![Permission {
            id: 3,
            slug: "dashboard".into(),
            name: "Dashboard".into(),
            http_method: vec![],
            http_path: "/".into(),
            created_at: None,
            updated_at: None,
        }];
        let form = form(None, &permissions, &ApiConfig::default());
        let listbox = form.fields.iter().find(|f| f.name == "permissions").unwrap();
        assert_eq!(listbox.kind, FieldKind::Listbox);
        assert_eq!(listbox.options[0].value, json!(3));
        assert_eq!(listbox.options[0].label, "Dashboard");
    }
}
