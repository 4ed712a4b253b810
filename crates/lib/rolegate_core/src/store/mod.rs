//! Persistence boundary for permissions and roles.
//!
//! Handlers only see the [`PermissionStore`] and [`RoleStore`] traits; the
//! concrete backend is chosen once at startup and bundled into [`Stores`].

pub mod memory;
pub mod postgres;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{Permission, PermissionInput, Role, RoleInput};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{entity} slug already taken: {slug}")]
    DuplicateSlug { entity: &'static str, slug: String },

    #[error("Unknown permission id: {0}")]
    UnknownPermission(i64),

    #[error("Role '{0}' is protected and cannot be deleted")]
    Protected(String),

    #[error("Database error: {0}")]
    DbError(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Permission>>;

    /// All permissions ordered by id.
    async fn find_all(&self) -> StoreResult<Vec<Permission>>;

    async fn create(&self, input: PermissionInput) -> StoreResult<Permission>;

    async fn update(&self, id: i64, input: PermissionInput) -> StoreResult<Permission>;

    /// Delete one permission and detach it from every role.
    /// Returns `false` when the id did not exist.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    /// Liveness probe for the backing store.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_or_fail(&self, id: i64) -> StoreResult<Permission> {
        self.find_by_id(id).await?.ok_or(StoreError::NotFound {
            entity: "Permission",
            id,
        })
    }
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Role>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Role>>;

    /// All roles ordered by id.
    async fn find_all(&self) -> StoreResult<Vec<Role>>;

    /// Fails with [`StoreError::UnknownPermission`] if any id is not stored.
    async fn create(&self, input: RoleInput) -> StoreResult<Role>;

    async fn update(&self, id: i64, input: RoleInput) -> StoreResult<Role>;

    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn find_or_fail(&self, id: i64) -> StoreResult<Role> {
        self.find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound { entity: "Role", id })
    }

    /// Resolve roles by slug, skipping unknown slugs.
    async fn find_by_slugs(&self, slugs: &[String]) -> StoreResult<Vec<Role>> {
        let mut roles = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if let Some(role) = self.find_by_slug(slug).await? {
                roles.push(role);
            }
        }
        Ok(roles)
    }
}

/// Refuse deletion of protected roles.
pub fn ensure_deletable(role: &Role) -> StoreResult<()> {
    if role.is_deletable() {
        Ok(())
    } else {
        Err(StoreError::Protected(role.slug.clone()))
    }
}

/// A backend name [`StoreBackend`] does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown store backend: {0}")]
pub struct UnknownBackend(pub String);

/// Store backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            other => Err(UnknownBackend(other.to_string())),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StoreBackend::Memory => "memory",
            StoreBackend::Postgres => "postgres",
        })
    }
}

/// Concrete stores injected into request handlers.
#[derive(Clone)]
pub struct Stores {
    pub permissions: Arc<dyn PermissionStore>,
    pub roles: Arc<dyn RoleStore>,
}

impl Stores {
    /// Process-local stores, empty at start.
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            permissions: store.clone(),
            roles: store,
        }
    }

    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            permissions: store.clone(),
            roles: store,
        }
    }

    pub async fn ping(&self) -> StoreResult<()> {
        self.permissions.ping().await
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
