use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use ratesreg_core::currency::ReferenceCodeSet;
use ratesreg_core::error::CoreError;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres URL. When unset the in-memory store is used.
    pub database_url: Option<String>,
    /// File of currency codes replacing the bundled ISO 4217 list.
    pub currency_codes_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    /// | `CURRENCY_CODES_PATH`  | unset (bundled ISO 4217)   |
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            database_url: non_empty_var("DATABASE_URL"),
            currency_codes_path: non_empty_var("CURRENCY_CODES_PATH").map(PathBuf::from),
        }
    }

    /// Load the reference currency code set this configuration names.
    pub fn reference_codes(&self) -> Result<ReferenceCodeSet, CoreError> {
        match &self.currency_codes_path {
            Some(path) => ReferenceCodeSet::load(path),
            None => Ok(ReferenceCodeSet::iso4217()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` when set, otherwise `default`. A set but unparseable value
/// aborts startup.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match non_empty_var(key) {
        Some(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has invalid value '{raw}': {e}")),
        None => default,
    }
}
