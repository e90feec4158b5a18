//! Server assembly: wires the persistence adapter, record service, and HTTP
//! routes into a running Actix application.

pub mod config;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::domain::UsersService;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users;
use crate::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

pub use config::{ConfigError, ServerConfig};

/// Build the shared HTTP state from a connection pool.
pub fn build_state(pool: DbPool) -> HttpState {
    let repository = DieselUserRepository::new(pool);
    HttpState::new(Arc::new(UsersService::new(Arc::new(repository))))
}

/// Run the HTTP server until shutdown.
///
/// Builds the connection pool, marks the service ready once the listener is
/// bound, and serves the users routes plus health probes (and Swagger UI in
/// debug builds).
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let pool = DbPool::new(
        PoolConfig::new(config.database_url()).with_max_size(config.pool_max_size),
    )
    .await
    .map_err(std::io::Error::other)?;

    let state = build_state(pool);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .configure(users::configure)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", crate::doc::ApiDoc::openapi()),
        );

        app
    })
    .bind(config.bind_addr())?;

    health_state.mark_ready();
    server.run().await
}
