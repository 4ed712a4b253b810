//! Request authorization against role permissions.

use crate::models::{Permission, Role};
use crate::rules::{self, Rule};

/// Glob match where `*` stands for any run of characters, including none.
pub fn wildcard_match(pattern: &str, value: &str) -> bool {
    let mut pieces = pattern.split('*');
    let head = pieces.next().unwrap_or_default();
    let Some(mut rest) = value.strip_prefix(head) else {
        return false;
    };

    let pieces: Vec<&str> = pieces.collect();
    let Some((tail, middle)) = pieces.split_last() else {
        return rest.is_empty();
    };

    // Leftmost placement of each inner piece leaves the most room for the tail.
    for piece in middle {
        match rest.find(piece) {
            Some(at) => rest = &rest[at + piece.len()..],
            None => return false,
        }
    }
    rest.ends_with(tail)
}

/// Decides whether roles may call a method + path.
///
/// Rule paths are relative to the admin route prefix, the same way they are
/// displayed. The `administrator` role passes every check.
#[derive(Debug, Clone, Default)]
pub struct AccessChecker {
    route_prefix: String,
}

impl AccessChecker {
    pub fn new(route_prefix: impl Into<String>) -> Self {
        Self {
            route_prefix: route_prefix.into(),
        }
    }

    pub fn allows(&self, roles: &[Role], method: &str, path: &str) -> bool {
        if roles.iter().any(Role::is_administrator) {
            return true;
        }
        roles
            .iter()
            .flat_map(|role| role.permissions.iter())
            .any(|permission| self.permission_allows(permission, method, path))
    }

    pub fn permission_allows(&self, permission: &Permission, method: &str, path: &str) -> bool {
        let request_path = path.trim_matches('/');
        permission
            .rules()
            .iter()
            .any(|rule| self.rule_allows(rule, method, request_path))
    }

    fn rule_allows(&self, rule: &Rule, method: &str, request_path: &str) -> bool {
        if rule.path.is_empty() || !rule.methods.allows(method) {
            return false;
        }
        let prefix = self.route_prefix.trim_matches('/');
        if rule.path == "*" {
            // The prefix itself and everything below it, never a sibling sharing its text.
            return prefix.is_empty()
                || request_path == prefix
                || wildcard_match(&format!("{prefix}/*"), request_path);
        }
        let pattern = rules::prefixed_path(prefix, &rule.path);
        wildcard_match(pattern.trim_matches('/'), request_path)
    }
}
