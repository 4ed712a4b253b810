//! Default permissions and the administrator role.

use tracing::info;

use crate::models::{ADMINISTRATOR_SLUG, HttpMethod, PermissionInput, RoleInput};
use crate::store::{StoreResult, Stores};

/// Slug of the permission that covers every admin route.
pub const ALL_PERMISSION_SLUG: &str = "*";

fn default_permissions() -> Vec<PermissionInput> {
    let permission = |slug: &str, name: &str, methods: Vec<HttpMethod>, path: &str| {
        PermissionInput {
            slug: slug.into(),
            name: name.into(),
            http_method: methods,
            http_path: path.into(),
        }
    };
    vec![
        permission(ALL_PERMISSION_SLUG, "All permission", vec![], "*"),
        permission("dashboard", "Dashboard", vec![HttpMethod::Get], "/"),
        permission("auth.login", "Login", vec![], "/auth/login\r\n/auth/logout"),
        permission(
            "auth.setting",
            "User setting",
            vec![HttpMethod::Get, HttpMethod::Put],
            "/auth/setting",
        ),
        permission(
            "auth.management",
            "Auth management",
            vec![],
            "/auth/roles\r\n/auth/permissions\r\n/auth/menu\r\n/auth/logs",
        ),
    ]
}

/// Install the default permissions and the administrator role.
///
/// Does nothing if the administrator role already exists. Permissions whose
/// slug is already taken are reused. Returns whether anything was installed.
pub async fn install_defaults(stores: &Stores) -> StoreResult<bool> {
    if stores.roles.find_by_slug(ADMINISTRATOR_SLUG).await?.is_some() {
        return Ok(false);
    }

    let existing = stores.permissions.find_all().await?;
    let mut all_permission_id = existing
        .iter()
        .find(|p| p.slug == ALL_PERMISSION_SLUG)
        .map(|p| p.id);

    for input in default_permissions() {
        if existing.iter().any(|p| p.slug == input.slug) {
            continue;
        }
        let created = stores.permissions.create(input).await?;
        if created.slug == ALL_PERMISSION_SLUG {
            all_permission_id = Some(created.id);
        }
    }

    let role = stores
        .roles
        .create(RoleInput {
            slug: ADMINISTRATOR_SLUG.into(),
            name: "Administrator".into(),
            permissions: all_permission_id.into_iter().collect(),
        })
        .await?;

    info!(role_id = role.id, "installed default permissions and administrator role");
    Ok(true)
}
