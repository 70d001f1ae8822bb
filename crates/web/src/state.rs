//! Application state for dependency injection.

use std::sync::Arc;
use std::time::Duration;

use fleet_service_lib::infra::Database;
use fleet_service_lib::FleetServices;

use crate::config::WebConfig;
use crate::session::SessionStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: FleetServices,
    pub database: Database,
    pub sessions: Arc<dyn SessionStore>,
    pub config: WebConfig,
}

impl AppState {
    /// Create new app state, wiring fleet services to the database.
    pub fn new(database: Database, sessions: Arc<dyn SessionStore>, config: WebConfig) -> Self {
        Self {
            services: FleetServices::new(database.get_connection()),
            database,
            sessions,
            config,
        }
    }

    /// How long stored sessions live.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.config.session.ttl_seconds)
    }
}
