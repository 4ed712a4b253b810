//! # rolegate_api
//!
//! HTTP admin API for permissions and roles.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod views;

use axum::Router;
use axum::routing::{get, post};
use rolegate_core::access::AccessChecker;
use rolegate_core::store::Stores;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{check, health, permissions, roles};

/// Shared application state passed to all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Permission and role stores chosen at startup.
    pub stores: Stores,
    /// API configuration.
    pub config: ApiConfig,
    /// Authorizer using the configured route prefix.
    pub checker: AccessChecker,
}

impl AppState {
    pub fn new(stores: Stores, config: ApiConfig) -> Self {
        let checker = AccessChecker::new(config.route_prefix.clone());
        Self {
            stores,
            config,
            checker,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `rolegate_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    rolegate_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route(
            routes::PERMISSIONS,
            get(permissions::index).post(permissions::store),
        )
        .route(routes::PERMISSIONS_CREATE, get(permissions::create_form))
        .route(
            routes::PERMISSIONS_ID,
            get(permissions::show)
                .put(permissions::update)
                .delete(permissions::destroy),
        )
        .route(routes::PERMISSIONS_ID_EDIT, get(permissions::edit_form))
        .route(routes::ROLES, get(roles::index).post(roles::store))
        .route(routes::ROLES_CREATE, get(roles::create_form))
        .route(
            routes::ROLES_ID,
            get(roles::show).put(roles::update).delete(roles::destroy),
        )
        .route(routes::ROLES_ID_EDIT, get(roles::edit_form))
        .route(routes::AUTH_CHECK, post(check::check_access));

    let prefix = state.config.trimmed_prefix().to_string();
    let root = Router::new().route(routes::HEALTH, get(health::health));
    let root = if prefix.is_empty() {
        root.merge(admin)
    } else {
        root.nest(&format!("/{prefix}"), admin)
    };

    root.layer(cors).with_state(state)
}
