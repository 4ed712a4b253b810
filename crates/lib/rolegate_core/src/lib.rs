//! # rolegate_core
//!
//! Core domain logic for Rolegate: the route rule codec, permission and role
//! records, their stores, and request authorization.

pub mod access;
pub mod display;
pub mod migrate;
pub mod models;
pub mod rules;
pub mod seed;
pub mod store;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
