//! Configuration management for the reservation server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file in the working directory is read first when present.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// A variable was set but could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid value {value:?} for {name}")]
pub struct ConfigError {
    /// Variable name
    pub name: &'static str,
    /// Raw value found in the environment
    pub value: String,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Booking persistence configuration
    pub storage: StorageConfig,
    /// Prometheus exporter configuration
    pub metrics: MetricsConfig,
}

/// HTTP server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin`; `*` allows any origin
    pub cors_allow_origin: String,
    /// How long shutdown waits for in-flight effects
    pub shutdown_timeout: Duration,
}

/// Booking persistence configuration
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// JSON file holding the booking history
    pub bookings_path: PathBuf,
    /// Seed movies, rooms, seats and customers from the built-in catalog
    pub seed_catalog: bool,
}

/// Prometheus exporter configuration
#[derive(Clone, Debug)]
pub struct MetricsConfig {
    /// Whether to start the exporter
    pub enabled: bool,
    /// Exporter bind host
    pub host: String,
    /// Exporter bind port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a numeric or boolean variable is set to
    /// something that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                host: text("HOST", "0.0.0.0"),
                port: parsed(&lookup, "PORT", 8080)?,
                cors_allow_origin: text("CORS_ALLOW_ORIGIN", "*"),
                shutdown_timeout: Duration::from_secs(parsed(&lookup, "SHUTDOWN_TIMEOUT", 30)?),
            },
            storage: StorageConfig {
                bookings_path: PathBuf::from(text("BOOKINGS_PATH", "cinereservas_bookings.json")),
                seed_catalog: flag(&lookup, "SEED_CATALOG", true)?,
            },
            metrics: MetricsConfig {
                enabled: flag(&lookup, "METRICS_ENABLED", false)?,
                host: text("METRICS_HOST", "0.0.0.0"),
                port: parsed(&lookup, "METRICS_PORT", 9090)?,
            },
        })
    }

    /// Address the HTTP server binds to
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `HOST` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        socket_addr("HOST", &self.server.host, self.server.port)
    }

    /// Address the Prometheus exporter binds to
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `METRICS_HOST` is not an IP address.
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        socket_addr("METRICS_HOST", &self.metrics.host, self.metrics.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_allow_origin: "*".to_string(),
                shutdown_timeout: Duration::from_secs(30),
            },
            storage: StorageConfig {
                bookings_path: PathBuf::from("cinereservas_bookings.json"),
                seed_catalog: true,
            },
            metrics: MetricsConfig {
                enabled: false,
                host: "0.0.0.0".to_string(),
                port: 9090,
            },
        }
    }
}

fn parsed<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError { name, value }),
    }
}

fn flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError { name, value }),
        },
    }
}

fn socket_addr(name: &'static str, host: &str, port: u16) -> Result<SocketAddr, ConfigError> {
    format!("{host}:{port}")
        .parse()
        .map_err(|_| ConfigError {
            name,
            value: host.to_string(),
        })
}
