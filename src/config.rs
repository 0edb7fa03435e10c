//! Run configuration.
//!
//! Built once at startup from `.env` + environment variables and passed by reference
//! into the importer. Every key has a default.
//!
//! | key | default |
//! |-----|---------|
//! | `EXPORTS_FOLDER` | `exports` |
//! | `IMPORT_DB_PATH` | `imports.db` |
//! | `IMPORT_DB_BUSY_TIMEOUT_MS` | `5000` |
//! | `IMPORT_LOG_FILE` | `log/log.txt` |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE_DIR: &str = "exports";
pub const DEFAULT_DB_PATH: &str = "imports.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_LOG_FILE: &str = "log/log.txt";

/// Load a `.env` file if present (silently ignored when missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    env_opt(key)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Connection parameters for the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite database file; created on first open.
    pub path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Directory scanned for `*.csv` files.
    pub source_dir: PathBuf,
    pub database: DatabaseConfig,
    /// Append-only status log.
    pub log_file: PathBuf,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            database: DatabaseConfig::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl ImportConfig {
    /// Build config from environment variables (call [`load_dotenv`] first).
    pub fn from_env() -> Self {
        Self {
            source_dir: env_path("EXPORTS_FOLDER", DEFAULT_SOURCE_DIR),
            database: DatabaseConfig {
                path: env_path("IMPORT_DB_PATH", DEFAULT_DB_PATH),
                busy_timeout: Duration::from_millis(env_u64(
                    "IMPORT_DB_BUSY_TIMEOUT_MS",
                    DEFAULT_BUSY_TIMEOUT_MS,
                )),
            },
            log_file: env_path("IMPORT_LOG_FILE", DEFAULT_LOG_FILE),
        }
    }
}
