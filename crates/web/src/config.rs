//! Web application configuration.

use std::env;

use common::{DatabaseConfig, ServerConfig, SessionBackend, SessionConfig};

/// Web application configuration.
#[derive(Debug, Clone, Default)]
pub struct WebConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
}

impl WebConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let server = ServerConfig::default();
        let database = DatabaseConfig::default();
        let session = SessionConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("WEB_HOST").unwrap_or(server.host),
                port: parsed("WEB_PORT").unwrap_or(server.port),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(database.url),
                max_connections: parsed("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(database.max_connections),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(database.min_connections),
            },
            session: SessionConfig {
                backend: parsed::<SessionBackend>("SESSION_BACKEND").unwrap_or(session.backend),
                redis_url: env::var("REDIS_URL").unwrap_or(session.redis_url),
                cookie_name: env::var("SESSION_COOKIE_NAME").unwrap_or(session.cookie_name),
                cookie_secure: parsed("SESSION_COOKIE_SECURE").unwrap_or(session.cookie_secure),
                ttl_seconds: parsed("SESSION_TTL_SECONDS").unwrap_or(session.ttl_seconds),
            },
        }
    }

    /// In-memory database and sessions, for tests and local experiments.
    pub fn in_memory() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::in_memory(),
            session: SessionConfig {
                backend: SessionBackend::Memory,
                ..SessionConfig::default()
            },
        }
    }
}

/// Read and parse an environment variable, ignoring unparsable values.
fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse().ok())
}
