//! Route paths, relative to the admin route prefix unless noted.

pub const PERMISSIONS: &str = "/auth/permissions";
pub const PERMISSIONS_CREATE: &str = "/auth/permissions/create";
pub const PERMISSIONS_ID: &str = "/auth/permissions/{id}";
pub const PERMISSIONS_ID_EDIT: &str = "/auth/permissions/{id}/edit";

pub const ROLES: &str = "/auth/roles";
pub const ROLES_CREATE: &str = "/auth/roles/create";
pub const ROLES_ID: &str = "/auth/roles/{id}";
pub const ROLES_ID_EDIT: &str = "/auth/roles/{id}/edit";

pub const AUTH_CHECK: &str = "/auth/check";

/// Mounted at the root, outside the prefix.
pub const HEALTH: &str = "/health";
