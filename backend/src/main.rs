//! Backend entry-point: loads settings, migrates the database and serves the
//! REST API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use fieldsales::inbound::http::health::HealthState;
use fieldsales::inbound::http::session_config::{BuildMode, session_settings_from_env};
use fieldsales::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use fieldsales::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_calendar(settings.calendar().map_err(io::Error::other)?)
        .with_rank_window(settings.rank_window().map_err(io::Error::other)?);

    match settings.database_url.as_deref() {
        Some(database_url) => {
            let applied = run_pending_migrations(database_url)
                .await
                .map_err(io::Error::other)?;
            info!(applied, "database migrations complete");
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.max_connections()),
            )
            .await
            .map_err(io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None => warn!("FIELDSALES_DATABASE_URL not set; serving fixture data"),
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting HTTP server");
    create_server(health_state, config)?.await
}
