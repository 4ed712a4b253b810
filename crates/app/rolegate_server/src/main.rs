//! Rolegate admin API server binary.
//!
//! Picks the store backend, optionally installs the default permissions and
//! administrator role, and serves the admin API until interrupted.

use clap::Parser;
use rolegate_api::config::ApiConfig;
use rolegate_core::store::{StoreBackend, Stores};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// CLI arguments for the API server.
///
/// Flags override the environment read by [`ApiConfig::from_env`].
#[derive(Parser, Debug)]
#[command(name = "rolegate_server", about = "Rolegate admin API server")]
struct Args {
    /// Address to listen on [env: BIND_ADDR, default: 127.0.0.1:3200].
    #[arg(long)]
    bind_addr: Option<String>,

    /// Store backend, `memory` or `postgres` [env: STORE_BACKEND, default: memory].
    #[arg(long)]
    store: Option<StoreBackend>,

    /// PostgreSQL connection URL, postgres backend only [env: DATABASE_URL].
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Prefix the admin routes are mounted under [env: ROUTE_PREFIX, default: admin].
    #[arg(long)]
    route_prefix: Option<String>,

    /// Install the default permissions and administrator role if missing.
    #[arg(long, default_value_t = false)]
    seed: bool,
}

impl Args {
    fn into_config(self, mut config: ApiConfig) -> ApiConfig {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(store) = self.store {
            config.store_backend = store;
        }
        if let Some(database_url) = self.database_url {
            config.database_url = database_url;
        }
        if let Some(route_prefix) = self.route_prefix {
            config.route_prefix = route_prefix;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| {
                    tracing_subscriber::EnvFilter::try_new(
                        "info,rolegate_api=debug,rolegate_core=debug",
                    )
                })?,
        )
        .init();

    let args = Args::parse();

    let max_connections = args.max_connections;
    let seed = args.seed;
    let config = args.into_config(ApiConfig::from_env()?);

    info!(
        bind_addr = %config.bind_addr,
        store = %config.store_backend,
        route_prefix = %config.route_prefix,
        "starting rolegate_server"
    );

    let stores = match config.store_backend {
        StoreBackend::Memory => Stores::memory(),
        StoreBackend::Postgres => {
            info!(max_connections, "configuring connection pool");
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(&config.database_url)
                .await?;

            info!("running database migrations");
            rolegate_api::migrate(&pool).await?;
            Stores::postgres(pool)
        }
    };

    if seed && rolegate_core::seed::install_defaults(&stores).await? {
        info!("default permissions installed");
    }

    let state = rolegate_api::AppState::new(stores, config.clone());
    let app = rolegate_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
