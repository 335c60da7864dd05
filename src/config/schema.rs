//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Deployment environment. Controls the `Secure` cookie attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Signing secret, required. Interpolated from ${SESSION_SECRET};
    /// an empty value is a fatal startup error.
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Cookie lifetime in seconds (30 days)
    #[serde(default = "default_max_age")]
    pub max_age_seconds: u64,
}

fn default_cookie_name() -> String {
    "kudos-session".to_string()
}

fn default_max_age() -> u64 {
    60 * 60 * 24 * 30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: default_cookie_name(),
            max_age_seconds: default_max_age(),
        }
    }
}

/// PostgreSQL connection configuration for the user store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub dbname: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "kudos".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            dbname: default_db_name(),
        }
    }
}

impl Config {
    /// Whether session cookies should carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }
}
