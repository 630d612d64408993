//! Storage configuration.
//!
//! Read from the environment; every value has a default except the
//! database URL, which is only required for the Postgres store. Numbers
//! that do not parse fall back to their default.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::errors::{StorageError, StorageResult};

/// Backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// Nothing survives the process
    Memory,
    /// One JSON document on disk
    #[default]
    File,
    Postgres,
}

impl FromStr for StoreKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(StorageError::Config(format!(
                "unknown store '{other}' (expected file, postgres or memory)"
            ))),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// Postgres pool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            min_connections: 1,
            connection_timeout_secs: 5,
        }
    }
}

/// Full storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub kind: StoreKind,
    /// Path of the JSON document used by the file store
    pub data_file: PathBuf,
    pub database: DatabaseConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::File,
            data_file: PathBuf::from("kaartmiddag.json"),
            database: DatabaseConfig::default(),
        }
    }
}

impl StorageConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `KM_STORE`: `file`, `postgres` or `memory` (default: file)
    /// - `KM_DATA_FILE`: JSON document path (default: kaartmiddag.json)
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 5)
    /// - `DB_MIN_CONNECTIONS`: Minimum pool size (default: 1)
    /// - `DB_CONNECTION_TIMEOUT_SECS`: Connection timeout in seconds (default: 5)
    pub fn from_env() -> StorageResult<Self> {
        let config = Self::load_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read the environment without validating, so callers can apply
    /// overrides first
    pub fn load_env() -> StorageResult<Self> {
        let defaults = Self::default();
        let kind = match env::var("KM_STORE") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.kind,
        };

        Ok(Self {
            kind,
            data_file: env::var("KM_DATA_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            database: DatabaseConfig {
                database_url: env::var("DATABASE_URL")
                    .ok()
                    .filter(|u| !u.trim().is_empty()),
                max_connections: parse_env_or(
                    "DB_MAX_CONNECTIONS",
                    defaults.database.max_connections,
                ),
                min_connections: parse_env_or(
                    "DB_MIN_CONNECTIONS",
                    defaults.database.min_connections,
                ),
                connection_timeout_secs: parse_env_or(
                    "DB_CONNECTION_TIMEOUT_SECS",
                    defaults.database.connection_timeout_secs,
                ),
            },
        })
    }

    /// In-memory configuration, mostly for tests
    pub fn memory() -> Self {
        Self {
            kind: StoreKind::Memory,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> StorageResult<()> {
        if self.kind == StoreKind::Postgres && self.database.database_url.is_none() {
            return Err(StorageError::Config(
                "DATABASE_URL must be set for the postgres store".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(StorageError::Config(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when unset or
/// unparsable
pub fn parse_env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
