//! Server configuration loading from file and environment variables.
//!
//! Loaded once at startup and immutable thereafter. The token signing
//! secret and the administrator credential pair live here as injected
//! configuration, never compiled-in constants.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Token and admin credential settings.
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "eventhub_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Token and administrator credential configuration.
///
/// All three non-defaulted values are required; [`Config::validate`] rejects
/// a configuration that leaves any of them empty.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify bearer tokens.
    #[serde(default)]
    pub jwt_secret: String,

    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,

    /// The administrator email.
    #[serde(default)]
    pub admin_email: String,

    /// Hex-encoded SHA-256 digest of the administrator password.
    #[serde(default)]
    pub admin_password_hash: String,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "eventhub.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_token_ttl_hours() -> u64 {
    24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            admin_email: String::new(),
            admin_password_hash: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required value is missing from file and environment.
    #[error("missing required config value: {0}")]
    MissingValue(&'static str),
}

impl Config {
    /// Checks that every required value is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingValue` naming the first missing value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue(
                "auth.jwt_secret (or EVENTHUB_JWT_SECRET)",
            ));
        }
        if self.auth.admin_email.trim().is_empty() {
            return Err(ConfigError::MissingValue(
                "auth.admin_email (or EVENTHUB_ADMIN_EMAIL)",
            ));
        }
        if self.auth.admin_password_hash.trim().is_empty() {
            return Err(ConfigError::MissingValue(
                "auth.admin_password_hash (or EVENTHUB_ADMIN_PASSWORD_HASH)",
            ));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `EVENTHUB_HOST` overrides `server.host`
/// - `EVENTHUB_PORT` overrides `server.port`
/// - `EVENTHUB_DB_PATH` overrides `database.path`
/// - `EVENTHUB_LOG_LEVEL` overrides `logging.level`
/// - `EVENTHUB_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `EVENTHUB_JWT_SECRET` overrides `auth.jwt_secret`
/// - `EVENTHUB_ADMIN_EMAIL` overrides `auth.admin_email`
/// - `EVENTHUB_ADMIN_PASSWORD_HASH` overrides `auth.admin_password_hash`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
/// Call [`Config::validate`] afterwards to enforce required values.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("EVENTHUB_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("EVENTHUB_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("EVENTHUB_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("EVENTHUB_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("EVENTHUB_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(secret) = std::env::var("EVENTHUB_JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }
    if let Ok(email) = std::env::var("EVENTHUB_ADMIN_EMAIL") {
        config.auth.admin_email = email;
    }
    if let Ok(hash) = std::env::var("EVENTHUB_ADMIN_PASSWORD_HASH") {
        config.auth.admin_password_hash = hash;
    }

    Ok(config)
}
