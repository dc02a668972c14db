//! Application configuration loading from environment variables.
//!
//! All configuration is loaded from the environment at startup. A `.env`
//! file is read first by `dotenvy` in `main`.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `JWT_SECRET`: Secret key for JWT signing
//! - `DATABASE_URL`: PostgreSQL connection string (postgres backend only)
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,campus_voice_api=debug,tower_http=debug")
//! - `STORAGE_BACKEND`: `postgres` or `memory` (default: postgres)
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3001)
//! - `DATABASE_MAX_CONNECTIONS`: DB pool size (default: 20)
//! - `REDIS_URL`: Enables submission rate limiting when set
//! - `TOKEN_TTL_HOURS`: Lifetime of issued tokens (default: 24)
//! - `ALLOWED_ORIGINS`: Comma separated CORS origins (default: "http://localhost:5173")
//! - `GEMINI_API_KEY`: Enables model-backed analysis and the abuse fallback
//! - `GEMINI_MODEL`: Model name (default: "gemini-1.5-flash")
//! - `AI_TIMEOUT_SECONDS`: Model call timeout (default: 10)
//! - `ABUSE_BAN_HOURS`: Ban length after an abusive submission, 1 to 8760 (default: 48)
//! - `RATE_LIMIT_COMPLAINTS_PER_HOUR`: Per-user submission limit, 0 disables (default: 20)
//! - `URGENCY_SWEEP_INTERVAL_SECONDS`: Background urgency sweep, 0 disables (default: 3600)
//! - `BOOTSTRAP_ADMIN_USERNAME`, `BOOTSTRAP_ADMIN_EMAIL`, `BOOTSTRAP_ADMIN_PASSWORD_HASH`:
//!   Seed an admin account at startup when all three are set
//! - `IGNORE_MISSING_MIGRATIONS`: Skip missing migrations (default: true)

use crate::infrastructure::security::abuse_detector::MAX_BAN_HOURS;
use serde::Deserialize;
use std::str::FromStr;

/// Where repositories keep their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in_memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Seed admin account created at startup if missing.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    /// Bcrypt hash (generate with the `generate_admin_hash` binary)
    pub password_hash: String,
}

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage_backend: StorageBackend,

    /// PostgreSQL connection string; required for the postgres backend
    pub database_url: Option<String>,

    /// Maximum number of concurrent database connections
    pub database_max_connections: u32,

    /// Redis connection URL for submission rate limiting
    pub redis_url: Option<String>,

    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Secret key for JWT token signing and verification
    pub jwt_secret: String,

    pub token_ttl_hours: i64,

    /// Origins allowed by CORS
    pub allowed_origins: Vec<String>,

    pub gemini_api_key: Option<String>,

    pub gemini_model: String,

    pub ai_timeout_seconds: u64,

    /// Ban length applied to authors of abusive submissions
    pub abuse_ban_hours: i64,

    /// Complaint submissions allowed per user per hour (0 disables)
    pub rate_limit_complaints_per_hour: u32,

    /// Interval of the background urgency sweep (0 disables)
    pub urgency_sweep_interval_seconds: u64,

    pub bootstrap_admin: Option<BootstrapAdmin>,

    /// Skip missing migrations during startup
    pub ignore_missing_migrations: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a set variable
    /// cannot be parsed to the expected type.
    pub fn from_env() -> anyhow::Result<Self> {
        let storage_backend = env_or("STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = env_optional("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            anyhow::bail!("Missing required environment variable: DATABASE_URL");
        }

        let bootstrap_admin = match (
            env_optional("BOOTSTRAP_ADMIN_USERNAME"),
            env_optional("BOOTSTRAP_ADMIN_EMAIL"),
            env_optional("BOOTSTRAP_ADMIN_PASSWORD_HASH"),
        ) {
            (Some(username), Some(email), Some(password_hash)) => Some(BootstrapAdmin {
                username,
                email,
                password_hash,
            }),
            _ => None,
        };

        Ok(Self {
            storage_backend,
            database_url,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 20)?,
            redis_url: env_optional("REDIS_URL"),
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3001)?,
            jwt_secret: env_required("JWT_SECRET")?,
            token_ttl_hours: env_or("TOKEN_TTL_HOURS", 24)?,
            allowed_origins: parse_origins(&env_or(
                "ALLOWED_ORIGINS",
                "http://localhost:5173".to_string(),
            )?),
            gemini_api_key: env_optional("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-1.5-flash".to_string())?,
            ai_timeout_seconds: env_or("AI_TIMEOUT_SECONDS", 10)?,
            abuse_ban_hours: check_ban_hours(env_or("ABUSE_BAN_HOURS", 48)?)?,
            rate_limit_complaints_per_hour: env_or("RATE_LIMIT_COMPLAINTS_PER_HOUR", 20)?,
            urgency_sweep_interval_seconds: env_or("URGENCY_SWEEP_INTERVAL_SECONDS", 3600)?,
            bootstrap_admin,
            ignore_missing_migrations: env_or("IGNORE_MISSING_MIGRATIONS", true)?,
        })
    }

    /// In-memory configuration with rate limiting, the model and the
    /// background sweep switched off.
    pub fn for_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            redis_url: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: jwt_secret.into(),
            token_ttl_hours: 24,
            allowed_origins: Vec::new(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            ai_timeout_seconds: 10,
            abuse_ban_hours: 48,
            rate_limit_complaints_per_hour: 0,
            urgency_sweep_interval_seconds: 0,
            bootstrap_admin: None,
            ignore_missing_migrations: true,
        }
    }
}

fn check_ban_hours(hours: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_BAN_HOURS).contains(&hours) {
        anyhow::bail!("ABUSE_BAN_HOURS must be between 1 and {MAX_BAN_HOURS}, got {hours}");
    }
    Ok(hours)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load a required environment variable.
///
/// # Errors
///
/// Returns an error if the variable is not set.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an optional variable, treating an empty value as unset.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
