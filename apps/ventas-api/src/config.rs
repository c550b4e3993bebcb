//! API server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Interface to bind
    pub bind_addr: IpAddr,

    /// SQLite database file (`:memory:` for a throwaway store)
    pub db_path: String,

    /// Pool size
    pub db_max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_port: 8080,
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            db_path: "./ventas.db".to_string(),
            db_max_connections: 5,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            http_port: parse_or(&lookup, "VENTAS_HTTP_PORT", defaults.http_port)?,

            bind_addr: parse_or(&lookup, "VENTAS_BIND_ADDR", defaults.bind_addr)?,

            db_path: lookup("VENTAS_DB_PATH").unwrap_or(defaults.db_path),

            db_max_connections: parse_or(
                &lookup,
                "VENTAS_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        };

        if config.db_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("VENTAS_DB_PATH".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "VENTAS_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.http_port)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.http_port, 8080);
        assert_eq!(config.db_path, "./ventas.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup_from(&[
            ("VENTAS_HTTP_PORT", "9090"),
            ("VENTAS_BIND_ADDR", "127.0.0.1"),
            ("VENTAS_DB_PATH", ":memory:"),
            ("VENTAS_DB_MAX_CONNECTIONS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(config.db_path, ":memory:");
        assert_eq!(config.db_max_connections, 2);
    }

    #[test]
    fn test_invalid_port() {
        let err = ApiConfig::from_lookup(lookup_from(&[("VENTAS_HTTP_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "VENTAS_HTTP_PORT"));
    }

    #[test]
    fn test_zero_connections_rejected() {
        let err = ApiConfig::from_lookup(lookup_from(&[("VENTAS_DB_MAX_CONNECTIONS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_empty_db_path_rejected() {
        let err = ApiConfig::from_lookup(lookup_from(&[("VENTAS_DB_PATH", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }
}
