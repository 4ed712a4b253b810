//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// Slug of the built-in role that can neither be deleted nor restricted.
pub const ADMINISTRATOR_SLUG: &str = "administrator";

/// Stored role with its associated permissions loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub slug: String,
    pub name: String,
    /// Ordered by permission id.
    pub permissions: Vec<Permission>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    pub fn is_administrator(&self) -> bool {
        self.slug == ADMINISTRATOR_SLUG
    }

    /// The administrator role is protected from deletion.
    pub fn is_deletable(&self) -> bool {
        !self.is_administrator()
    }

    pub fn permission_names(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn permission_ids(&self) -> Vec<i64> {
        self.permissions.iter().map(|p| p.id).collect()
    }
}

/// Create/update payload for a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleInput {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    /// Permission ids to associate. Replaces the previous set on update.
    #[serde(default)]
    pub permissions: Vec<i64>,
}
