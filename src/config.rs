//! Server configuration from environment variables.

use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Read configuration from the environment, with development defaults.
    /// Unparseable numeric values fall back to the default.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8000);
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/casting_agency".into());
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        ServerConfig {
            host,
            port,
            database_url,
            max_connections,
        }
    }
}
