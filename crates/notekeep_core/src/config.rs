//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe storage, logging and password-hashing settings in one value.
//! - Load settings from JSON with every field defaulted.
//!
//! # Invariants
//! - `validate()` must pass before a config reaches `CoreContext::open`.
//! - Unknown JSON fields are rejected instead of silently ignored.

use crate::logging::{default_log_level, LogLevel};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "notekeep.sqlite3";
const DEFAULT_POOL_MAX_SIZE: u32 = 8;
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// OWASP baseline for Argon2id.
const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;
const DEFAULT_HASH_ITERATIONS: u32 = 2;
const DEFAULT_HASH_PARALLELISM: u32 = 1;

/// Top-level configuration for the access-control core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub password_hash: PasswordHashConfig,
}

/// SQLite file and pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path. Created on first open.
    pub path: PathBuf,
    /// Upper bound on concurrently open connections.
    pub pool_max_size: u32,
    /// How long a checkout may wait for a free connection.
    pub connection_timeout_ms: u64,
    /// SQLite busy handler timeout for lock contention.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// File logging settings. Logging stays off when `dir` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

/// Argon2id cost parameters. Fixed for the lifetime of a credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

impl PasswordHashConfig {
    /// Builds the Argon2 parameter set, rejecting out-of-range costs.
    pub fn to_params(self) -> Result<argon2::Params, ConfigError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| ConfigError::InvalidPasswordHash(err.to_string()))
    }
}

/// Configuration load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    InvalidPoolSize,
    InvalidTimeout(&'static str),
    InvalidLogLevel(String),
    InvalidPasswordHash(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::InvalidPoolSize => write!(f, "database.pool_max_size must be at least 1"),
            Self::InvalidTimeout(field) => write!(f, "{field} must be greater than zero"),
            Self::InvalidLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidPasswordHash(message) => {
                write!(f, "invalid password_hash parameters: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl CoreConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Config rooted at a specific database file, other settings defaulted.
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseConfig {
                path: path.into(),
                ..DatabaseConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.pool_max_size == 0 {
            return Err(ConfigError::InvalidPoolSize);
        }
        if self.database.connection_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("database.connection_timeout_ms"));
        }
        if self.database.busy_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout("database.busy_timeout_ms"));
        }

        LogLevel::parse(&self.logging.level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.logging.level.trim().to_string()))?;

        self.password_hash.to_params()?;
        Ok(())
    }
}
