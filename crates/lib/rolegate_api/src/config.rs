//! API server configuration.

use rolegate_core::store::{StoreBackend, UnknownBackend};

/// Default admin route prefix.
pub const DEFAULT_ROUTE_PREFIX: &str = "admin";

/// Configuration for the API server. Built once at startup.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3200").
    pub bind_addr: String,
    /// PostgreSQL connection URL, used by the `postgres` backend.
    pub database_url: String,
    /// Prefix the admin routes are mounted under and rule paths are shown with.
    pub route_prefix: String,
    /// Which store implementation to construct.
    pub store_backend: StoreBackend,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable        | Default                              |
    /// |-----------------|--------------------------------------|
    /// | `BIND_ADDR`     | `127.0.0.1:3200`                     |
    /// | `DATABASE_URL`  | `postgres://localhost:5432/rolegate` |
    /// | `ROUTE_PREFIX`  | `admin`                              |
    /// | `STORE_BACKEND` | `memory`                             |
    pub fn from_env() -> Result<Self, UnknownBackend> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ApiConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UnknownBackend> {
        let defaults = Self::default();
        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => defaults.store_backend,
        };
        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            route_prefix: lookup("ROUTE_PREFIX").unwrap_or(defaults.route_prefix),
            store_backend,
        })
    }

    /// Route prefix without surrounding slashes; empty when routes are unprefixed.
    pub fn trimmed_prefix(&self) -> &str {
        self.route_prefix.trim_matches('/')
    }

    /// Absolute URL of an admin route, honouring the prefix.
    pub fn admin_url(&self, path: &str) -> String {
        rolegate_core::rules::prefixed_path(&self.route_prefix, path)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3200".into(),
            database_url: "postgres://localhost:5432/rolegate".into(),
            route_prefix: DEFAULT_ROUTE_PREFIX.into(),
            store_backend: StoreBackend::Memory,
        }
    }
}
