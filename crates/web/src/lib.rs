//! Taxi fleet web application.
//!
//! Session-authenticated HTTP interface over the fleet service: dashboard,
//! manufacturers, cars and drivers.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod state;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use common::SessionBackend;
use fleet_service_lib::infra::Database;

use crate::config::WebConfig;
use crate::routes::create_router;
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

/// Connect the database (applying migrations) and the session store.
pub async fn build_state(config: WebConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let database = Database::connect(&config.database).await?;

    let sessions: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::Redis => {
            Arc::new(RedisSessionStore::connect(&config.session.redis_url).await?)
        }
        SessionBackend::Memory => {
            warn!("Using in-process session store; sessions are lost on restart");
            Arc::new(MemorySessionStore::new())
        }
    };

    Ok(AppState::new(database, sessions, config))
}

/// Run the HTTP server with the given configuration.
pub async fn run_server(config: WebConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = build_state(config).await?;
    let app = create_router(state);

    info!("Taxi service listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
