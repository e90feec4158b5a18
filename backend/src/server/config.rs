//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) database_url: String,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pool_max_size: u32,
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable {name}")]
    MissingVar {
        /// Variable name.
        name: &'static str,
    },
    /// An environment variable holds an unparseable value.
    #[error("invalid value for {name}: {message}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Parse failure description.
        message: String,
    },
}

impl ServerConfig {
    /// Default bind address when `BIND_ADDR` is not set.
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:3000";

    /// Construct a configuration from explicit values.
    pub fn new(database_url: impl Into<String>, bind_addr: SocketAddr) -> Self {
        Self {
            database_url: database_url.into(),
            bind_addr,
            pool_max_size: 10,
        }
    }

    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` is required; `BIND_ADDR` defaults to
    /// [`Self::DEFAULT_BIND_ADDR`]; `DB_POOL_MAX_SIZE` defaults to 10.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar {
                name: "DATABASE_URL",
            })?;

        let bind_addr = match std::env::var("BIND_ADDR") {
            Ok(raw) => raw.parse().map_err(|err: std::net::AddrParseError| {
                ConfigError::InvalidVar {
                    name: "BIND_ADDR",
                    message: err.to_string(),
                }
            })?,
            Err(_) => Self::default_bind_addr(),
        };

        let pool_max_size = match std::env::var("DB_POOL_MAX_SIZE") {
            Ok(raw) => raw.parse().map_err(|err: std::num::ParseIntError| {
                ConfigError::InvalidVar {
                    name: "DB_POOL_MAX_SIZE",
                    message: err.to_string(),
                }
            })?,
            Err(_) => 10,
        };

        Ok(Self {
            database_url,
            bind_addr,
            pool_max_size,
        })
    }

    /// Set the connection pool's maximum size.
    pub fn with_pool_max_size(mut self, pool_max_size: u32) -> Self {
        self.pool_max_size = pool_max_size;
        self
    }

    /// The PostgreSQL connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// The socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    fn default_bind_addr() -> SocketAddr {
        Self::DEFAULT_BIND_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_construction_uses_defaults_for_pool() {
        let config = ServerConfig::new(
            "postgres://localhost/records",
            "127.0.0.1:8080".parse().expect("addr"),
        );
        assert_eq!(config.database_url(), "postgres://localhost/records");
        assert_eq!(config.pool_max_size, 10);
    }

    #[test]
    fn pool_size_is_adjustable() {
        let config = ServerConfig::new(
            "postgres://localhost/records",
            "127.0.0.1:8080".parse().expect("addr"),
        )
        .with_pool_max_size(3);
        assert_eq!(config.pool_max_size, 3);
    }

    #[test]
    fn default_bind_addr_parses() {
        assert_eq!(
            ServerConfig::default_bind_addr(),
            SocketAddr::from(([0, 0, 0, 0], 3000))
        );
    }
}
