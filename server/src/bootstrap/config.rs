//! Environment-driven configuration.
//!
//! Everything has a development default so `pulse-api` starts with no
//! environment at all; production deployments set the variables below.

use std::env;
use std::time::Duration;

use crate::bootstrap::errors::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub db: DbConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_port: u16,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub logging_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Email domains whose submissions are auto-approved. Exact match
    /// on the domain part, no subdomain expansion.
    pub trusted_domains: Vec<String>,
    /// Root directory for stored thumbnails.
    pub media_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let rest_port = match env::var("REST_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("invalid REST_PORT: {raw}")))?,
            Err(_) => 8000,
        };

        Ok(Self {
            server: ServerConfig { rest_port },
            db: DbConfig {
                url: env_or("DATABASE_URL", "sqlite://pulse.db?mode=rwc"),
                max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env("DB_MIN_CONNECTIONS", 1)?,
                connect_timeout: Duration::from_secs(parse_env("DB_CONNECT_TIMEOUT_SECS", 8)?),
                idle_timeout: Duration::from_secs(parse_env("DB_IDLE_TIMEOUT_SECS", 300)?),
                logging_enabled: env::var("DB_LOGGING").is_ok(),
            },
            cors: CorsConfig {
                allowed_origins: env_list("CORS_ALLOWED_ORIGINS", "http://localhost:3000"),
                allow_credentials: env::var("CORS_ALLOW_CREDENTIALS").is_ok(),
            },
            auth: AuthConfig {
                jwt_secret: env_or("JWT_SECRET", "insecure-dev-secret"),
            },
            content: ContentConfig {
                trusted_domains: env_list("TRUSTED_EMAIL_DOMAINS", "example.org"),
                media_dir: env_or("MEDIA_DIR", "media"),
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_list(key: &str, default: &str) -> Vec<String> {
    env_or(key, default)
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("invalid {key}: {raw}"))),
        Err(_) => Ok(default),
    }
}
