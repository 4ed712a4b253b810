//! In-memory store, used for development servers and tests.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{PermissionStore, RoleStore, StoreError, StoreResult};
use crate::models::{Permission, PermissionInput, Role, RoleInput};

#[derive(Debug, Clone)]
struct RoleRow {
    id: i64,
    slug: String,
    name: String,
    permission_ids: BTreeSet<i64>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
struct Tables {
    permissions: BTreeMap<i64, Permission>,
    roles: BTreeMap<i64, RoleRow>,
    last_permission_id: i64,
    last_role_id: i64,
}

impl Tables {
    fn permission_slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.permissions
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except)
    }

    fn role_slug_taken(&self, slug: &str, except: Option<i64>) -> bool {
        self.roles
            .values()
            .any(|r| r.slug == slug && Some(r.id) != except)
    }

    fn check_permission_ids(&self, ids: &[i64]) -> StoreResult<BTreeSet<i64>> {
        if let Some(missing) = ids.iter().find(|id| !self.permissions.contains_key(id)) {
            return Err(StoreError::UnknownPermission(*missing));
        }
        Ok(ids.iter().copied().collect())
    }

    fn resolve(&self, row: &RoleRow) -> Role {
        Role {
            id: row.id,
            slug: row.slug.clone(),
            name: row.name.clone(),
            permissions: row
                .permission_ids
                .iter()
                .filter_map(|id| self.permissions.get(id).cloned())
                .collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Process-local permission and role tables behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Permission>> {
        Ok(self.tables.read().await.permissions.get(&id).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Permission>> {
        Ok(self.tables.read().await.permissions.values().cloned().collect())
    }

    async fn create(&self, input: PermissionInput) -> StoreResult<Permission> {
        let mut tables = self.tables.write().await;
        if tables.permission_slug_taken(&input.slug, None) {
            return Err(StoreError::DuplicateSlug {
                entity: "Permission",
                slug: input.slug,
            });
        }
        tables.last_permission_id += 1;
        let now = Utc::now();
        let permission = Permission {
            id: tables.last_permission_id,
            slug: input.slug,
            name: input.name,
            http_method: input.http_method,
            http_path: input.http_path,
            created_at: Some(now),
            updated_at: Some(now),
        };
        tables.permissions.insert(permission.id, permission.clone());
        debug!(id = permission.id, slug = %permission.slug, "permission created");
        Ok(permission)
    }

    async fn update(&self, id: i64, input: PermissionInput) -> StoreResult<Permission> {
        let mut tables = self.tables.write().await;
        if !tables.permissions.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "Permission",
                id,
            });
        }
        if tables.permission_slug_taken(&input.slug, Some(id)) {
            return Err(StoreError::DuplicateSlug {
                entity: "Permission",
                slug: input.slug,
            });
        }
        let permission = tables
            .permissions
            .get_mut(&id)
            .ok_or(StoreError::NotFound {
                entity: "Permission",
                id,
            })?;
        permission.slug = input.slug;
        permission.name = input.name;
        permission.http_method = input.http_method;
        permission.http_path = input.http_path;
        permission.updated_at = Some(Utc::now());
        Ok(permission.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.permissions.remove(&id).is_none() {
            return Ok(false);
        }
        for role in tables.roles.values_mut() {
            role.permission_ids.remove(&id);
        }
        debug!(id, "permission deleted");
        Ok(true)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.get(&id).map(|row| tables.resolve(row)))
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Role>> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .values()
            .find(|row| row.slug == slug)
            .map(|row| tables.resolve(row)))
    }

    async fn find_all(&self) -> StoreResult<Vec<Role>> {
        let tables = self.tables.read().await;
        Ok(tables.roles.values().map(|row| tables.resolve(row)).collect())
    }

    async fn create(&self, input: RoleInput) -> StoreResult<Role> {
        let mut tables = self.tables.write().await;
        if tables.role_slug_taken(&input.slug, None) {
            return Err(StoreError::DuplicateSlug {
                entity: "Role",
                slug: input.slug,
            });
        }
        let permission_ids = tables.check_permission_ids(&input.permissions)?;
        tables.last_role_id += 1;
        let now = Utc::now();
        let row = RoleRow {
            id: tables.last_role_id,
            slug: input.slug,
            name: input.name,
            permission_ids,
            created_at: Some(now),
            updated_at: Some(now),
        };
        let role = tables.resolve(&row);
        tables.roles.insert(row.id, row);
        debug!(id = role.id, slug = %role.slug, "role created");
        Ok(role)
    }

    async fn update(&self, id: i64, input: RoleInput) -> StoreResult<Role> {
        let mut tables = self.tables.write().await;
        if !tables.roles.contains_key(&id) {
            return Err(StoreError::NotFound { entity: "Role", id });
        }
        if tables.role_slug_taken(&input.slug, Some(id)) {
            return Err(StoreError::DuplicateSlug {
                entity: "Role",
                slug: input.slug,
            });
        }
        let permission_ids = tables.check_permission_ids(&input.permissions)?;
        let row = tables
            .roles
            .get_mut(&id)
            .ok_or(StoreError::NotFound { entity: "Role", id })?;
        row.slug = input.slug;
        row.name = input.name;
        row.permission_ids = permission_ids;
        row.updated_at = Some(Utc::now());
        let row = row.clone();
        Ok(tables.resolve(&row))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let removed = self.tables.write().await.roles.remove(&id).is_some();
        if removed {
            debug!(id, "role deleted");
        }
        Ok(removed)
    }
}
