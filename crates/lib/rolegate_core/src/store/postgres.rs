//! PostgreSQL store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, warn};

use super::{PermissionStore, RoleStore, StoreError, StoreResult};
use crate::models::{HttpMethod, Permission, PermissionInput, Role, RoleInput};

const PERMISSION_COLUMNS: &str = "id, slug, name, http_method, http_path, created_at, updated_at";
const ROLE_COLUMNS: &str = "id, slug, name, created_at, updated_at";

/// Row returned by permission queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct PermissionRow {
    id: i64,
    slug: String,
    name: String,
    http_method: Vec<String>,
    http_path: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        let http_method = row
            .http_method
            .iter()
            .filter_map(|m| match m.parse::<HttpMethod>() {
                Ok(method) => Some(method),
                Err(e) => {
                    warn!(permission_id = row.id, "skipping stored method: {e}");
                    None
                }
            })
            .collect();
        Permission {
            id: row.id,
            slug: row.slug,
            name: row.name,
            http_method,
            http_path: row.http_path,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row returned by role queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RoleRow {
    id: i64,
    slug: String,
    name: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

/// Permission joined through the association table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct RolePermissionRow {
    role_id: i64,
    #[sqlx(flatten)]
    permission: PermissionRow,
}

fn method_strings(methods: &[HttpMethod]) -> Vec<String> {
    methods.iter().map(|m| m.as_str().to_string()).collect()
}

fn map_unique(entity: &'static str, slug: &str) -> impl FnOnce(sqlx::Error) -> StoreError {
    let slug = slug.to_string();
    move |e| {
        if let sqlx::Error::Database(db) = &e
            && db.is_unique_violation()
        {
            return StoreError::DuplicateSlug { entity, slug };
        }
        StoreError::DbError(e)
    }
}

/// Permission and role tables in PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach permissions to already-loaded role rows.
    async fn load_roles(&self, rows: Vec<RoleRow>) -> StoreResult<Vec<Role>> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let joined = sqlx::query_as::<_, RolePermissionRow>(
            "SELECT rp.role_id, p.id, p.slug, p.name, p.http_method, p.http_path, \
             p.created_at, p.updated_at \
             FROM admin_role_permissions rp \
             JOIN admin_permissions p ON p.id = rp.permission_id \
             WHERE rp.role_id = ANY($1) \
             ORDER BY p.id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_role: BTreeMap<i64, Vec<Permission>> = BTreeMap::new();
        for row in joined {
            by_role
                .entry(row.role_id)
                .or_default()
                .push(row.permission.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Role {
                permissions: by_role.remove(&row.id).unwrap_or_default(),
                id: row.id,
                slug: row.slug,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    async fn load_role(&self, row: Option<RoleRow>) -> StoreResult<Option<Role>> {
        match row {
            Some(row) => Ok(self.load_roles(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Deduplicate ids and fail on the first one that is not stored.
    async fn check_permission_ids(&self, ids: &[i64]) -> StoreResult<Vec<i64>> {
        let mut wanted: Vec<i64> = ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();
        let found = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM admin_permissions WHERE id = ANY($1)",
        )
        .bind(&wanted)
        .fetch_all(&self.pool)
        .await?;
        if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
            return Err(StoreError::UnknownPermission(*missing));
        }
        Ok(wanted)
    }

    async fn role_row_by_id(&self, id: i64) -> StoreResult<Option<RoleRow>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM admin_roles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl PermissionStore for PgStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM admin_permissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Permission::from))
    }

    async fn find_all(&self) -> StoreResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM admin_permissions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Permission::from).collect())
    }

    async fn create(&self, input: PermissionInput) -> StoreResult<Permission> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!(
            "INSERT INTO admin_permissions (slug, name, http_method, http_path) \
             VALUES ($1, $2, $3, $4) RETURNING {PERMISSION_COLUMNS}"
        ))
        .bind(&input.slug)
        .bind(&input.name)
        .bind(method_strings(&input.http_method))
        .bind(&input.http_path)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique("Permission", &input.slug))?;
        debug!(id = row.id, slug = %row.slug, "permission created");
        Ok(row.into())
    }

    async fn update(&self, id: i64, input: PermissionInput) -> StoreResult<Permission> {
        let row = sqlx::query_as::<_, PermissionRow>(&format!(
            "UPDATE admin_permissions \
             SET slug = $2, name = $3, http_method = $4, http_path = $5, updated_at = now() \
             WHERE id = $1 RETURNING {PERMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.name)
        .bind(method_strings(&input.http_method))
        .bind(&input.http_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique("Permission", &input.slug))?;
        row.map(Permission::from).ok_or(StoreError::NotFound {
            entity: "Permission",
            id,
        })
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        // Association rows go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM admin_permissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RoleStore for PgStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>> {
        let row = self.role_row_by_id(id).await?;
        self.load_role(row).await
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM admin_roles WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        self.load_role(row).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "SELECT {ROLE_COLUMNS} FROM admin_roles ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        self.load_roles(rows).await
    }

    async fn create(&self, input: RoleInput) -> StoreResult<Role> {
        let permission_ids = self.check_permission_ids(&input.permissions).await?;

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "INSERT INTO admin_roles (slug, name) VALUES ($1, $2) RETURNING {ROLE_COLUMNS}"
        ))
        .bind(&input.slug)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique("Role", &input.slug))?;

        sqlx::query(
            "INSERT INTO admin_role_permissions (role_id, permission_id) \
             SELECT $1, UNNEST($2::bigint[])",
        )
        .bind(row.id)
        .bind(&permission_ids)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        let id = row.id;
        debug!(id, slug = %row.slug, "role created");
        self.load_role(Some(row))
            .await?
            .ok_or(StoreError::NotFound { entity: "Role", id })
    }

    async fn update(&self, id: i64, input: RoleInput) -> StoreResult<Role> {
        let permission_ids = self.check_permission_ids(&input.permissions).await?;

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, RoleRow>(&format!(
            "UPDATE admin_roles SET slug = $2, name = $3, updated_at = now() \
             WHERE id = $1 RETURNING {ROLE_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.slug)
        .bind(&input.name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_unique("Role", &input.slug))?
        .ok_or(StoreError::NotFound { entity: "Role", id })?;

        sqlx::query("DELETE FROM admin_role_permissions WHERE role_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO admin_role_permissions (role_id, permission_id) \
             SELECT $1, UNNEST($2::bigint[])",
        )
        .bind(id)
        .bind(&permission_ids)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.load_role(Some(row))
            .await?
            .ok_or(StoreError::NotFound { entity: "Role", id })
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM admin_roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
