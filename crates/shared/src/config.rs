//! Layered application configuration.
//!
//! Values resolve in order: `config/default.toml`, then
//! `config/{RUN_MODE}.toml`, then `VETBILL__`-prefixed environment
//! variables (`VETBILL__DATABASE__URL` overrides `database.url`).

use serde::Deserialize;

/// Top-level configuration for the billing backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads the layered configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a layer fails to parse or a required value
    /// (the database URL) is missing from every layer.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VETBILL").separator("__"))
            .build()?
            .try_deserialize()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The address string the server binds to, `host:port`.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    /// Connections the pool keeps warm.
    #[serde(default = "DatabaseConfig::default_min_connections")]
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Settings for a bare URL with default pool sizing. Used by the
    /// auxiliary binaries that take `DATABASE_URL` directly.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: Self::default_max_connections(),
            min_connections: Self::default_min_connections(),
        }
    }

    fn default_max_connections() -> u32 {
        10
    }

    fn default_min_connections() -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_server_overrides() {
        let cfg: ServerConfig = serde_json::from_str(r#"{"host": "127.0.0.1"}"#).unwrap();
        assert_eq!(cfg.listen_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_database_pool_defaults() {
        let cfg: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/vetbill"}"#).unwrap();
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.min_connections, 1);
    }

    #[test]
    fn test_database_from_url() {
        let cfg = DatabaseConfig::from_url("postgres://localhost/vetbill_test");
        assert_eq!(cfg.url, "postgres://localhost/vetbill_test");
        assert_eq!(cfg.max_connections, 10);
    }
}
