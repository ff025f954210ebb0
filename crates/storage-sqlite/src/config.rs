use log::warn;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DB_PATH: &str = "./db/fundmatch.db";
const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 30_000;

/// SQLite storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub db_path: String,
    pub pool_size: u32,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// How long a caller waits for a free pooled connection.
    pub connection_timeout: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            connection_timeout: Duration::from_millis(DEFAULT_CONNECTION_TIMEOUT_MS),
        }
    }
}

impl StorageConfig {
    /// Reads `FUNDMATCH_DB_*` variables, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let db_path =
            std::env::var("FUNDMATCH_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let pool_size = env_or("FUNDMATCH_DB_POOL_SIZE", DEFAULT_POOL_SIZE).max(1);
        let busy_timeout_ms = env_or("FUNDMATCH_DB_BUSY_TIMEOUT_MS", DEFAULT_BUSY_TIMEOUT_MS);
        let connection_timeout_ms = env_or(
            "FUNDMATCH_DB_CONNECTION_TIMEOUT_MS",
            DEFAULT_CONNECTION_TIMEOUT_MS,
        );
        Self {
            db_path,
            pool_size,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            connection_timeout: Duration::from_millis(connection_timeout_ms),
        }
    }

    /// Default settings pointing at `db_path`.
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }
}

fn env_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {}='{}', using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
