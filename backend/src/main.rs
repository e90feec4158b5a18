//! Backend entry-point: applies migrations and serves the REST endpoints.

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::outbound::persistence::migrate;
use backend::server::{ServerConfig, run};

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

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    migrate::run_pending_migrations(config.database_url()).map_err(std::io::Error::other)?;

    info!(addr = %config.bind_addr(), "starting server");
    run(config).await
}
