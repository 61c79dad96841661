//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Origins allowed by CORS when `CORS_ALLOWED_ORIGINS` is unset
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:3001,http://localhost:3002";

/// Default JSON body limit (10 MiB)
const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("Unknown LOG_FORMAT: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (SQLite)
    pub database_url: String,
    pub db_max_connections: u32,

    /// HTTP server
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub body_limit_bytes: usize,

    /// Runtime configuration
    pub environment: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    /// Local development settings, the same values `from_env` falls back to
    fn default() -> Self {
        Self {
            database_url: "sqlite://parley.db?mode=rwc".to_string(),
            db_max_connections: 5,
            port: 3001,
            cors_allowed_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            environment: "development".to_string(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Self::default();
        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,

            port: parse_var("PORT", defaults.port)?,
            cors_allowed_origins: match env::var("CORS_ALLOWED_ORIGINS") {
                Ok(raw) => parse_origins(&raw),
                Err(_) => defaults.cors_allowed_origins,
            },
            body_limit_bytes: parse_var("BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,

            environment: env::var("APP_ENV").unwrap_or(defaults.environment),
            log_format: match env::var("LOG_FORMAT") {
                Ok(v) => v.parse()?,
                Err(_) => defaults.log_format,
            },
        };

        Ok(config)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
