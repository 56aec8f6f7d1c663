//! Backend entry-point: loads settings, prepares the store, and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rideshare::demo_data::seed_demo_data_on_startup;
use rideshare::inbound::http::health::HealthState;
use rideshare::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use rideshare::outbound::security::secret_fingerprint;
use rideshare::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let jwt_secret = settings.jwt_secret().map_err(std::io::Error::other)?;
    let token_ttl = settings.token_ttl().map_err(std::io::Error::other)?;
    let pool_max_size = settings.pool_max_size().map_err(std::io::Error::other)?;
    info!(
        fingerprint = %secret_fingerprint(&jwt_secret),
        token_ttl_hours = token_ttl.num_hours(),
        "token signing configured"
    );

    let database_path = settings.database_path();
    run_migrations(database_path)
        .await
        .map_err(std::io::Error::other)?;
    let db_pool = DbPool::new(PoolConfig::new(database_path).with_max_size(pool_max_size))
        .await
        .map_err(std::io::Error::other)?;

    seed_demo_data_on_startup(&settings, &db_pool)
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, db_pool, jwt_secret).with_token_ttl(token_ttl);
    info!(bind_addr = %config.bind_addr(), database = database_path, "starting server");
    let server = create_server(health_state.clone(), config)?;

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
