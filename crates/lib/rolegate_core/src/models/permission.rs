//! Permission domain model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{self, Rule};

/// HTTP methods a permission may be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Every selectable method, in display order.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl AsRef<str> for HttpMethod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method token outside [`HttpMethod::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Stored permission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub slug: String,
    pub name: String,
    /// Default methods for bare path lines. Empty = any method.
    pub http_method: Vec<HttpMethod>,
    /// Raw path specification, one rule per line.
    pub http_path: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Permission {
    /// Rules described by `http_path`, resolved against `http_method`.
    pub fn rules(&self) -> Vec<Rule> {
        rules::parse(&self.http_path, &self.http_method)
    }
}

/// Create/update payload for a permission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionInput {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub http_method: Vec<HttpMethod>,
    #[serde(default)]
    pub http_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Methods;

    #[test]
    fn method_from_str_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert_eq!(" Options ".parse::<HttpMethod>(), Ok(HttpMethod::Options));
        assert_eq!(
            "TRACE".parse::<HttpMethod>(),
            Err(UnknownMethod("TRACE".into()))
        );
        assert_eq!(
            UnknownMethod("BREW".into()).to_string(),
            "unknown HTTP method: BREW"
        );
    }

    #[test]
    fn methods_serialize_uppercase() {
        let json = serde_json::to_string(&HttpMethod::ALL).unwrap();
        assert_eq!(
            json,
            r#"["GET","POST","PUT","DELETE","PATCH","OPTIONS","HEAD"]"#
        );
    }

    #[test]
    fn permission_rules_use_default_methods() {
        let permission = Permission {
            id: 1,
            slug: "users".into(),
            name: "Users".into(),
            http_method: vec![HttpMethod::Get],
            http_path: "/users\r\nPOST:/users".into(),
            created_at: None,
            updated_at: None,
        };
        let rules = permission.rules();
        assert_eq!(rules[0].methods, Methods::Only(vec!["GET".into()]));
        assert_eq!(rules[1].methods, Methods::Only(vec!["POST".into()]));
    }

    #[test]
    fn input_fields_default_when_missing() {
        let input: PermissionInput = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(input.slug, "");
        assert!(input.http_method.is_empty());
    }
}
