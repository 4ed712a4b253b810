//! Domain models for permissions and roles.

pub mod permission;
pub mod role;

pub use permission::{HttpMethod, Permission, PermissionInput, UnknownMethod};
pub use role::{ADMINISTRATOR_SLUG, Role, RoleInput};
