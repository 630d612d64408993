//! CLI configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use kaartmiddag::constants::{DEFAULT_TABLE_CAPACITY, MAX_TABLE_CAPACITY};
use kaartmiddag::seating::SeatingConfig;
use kaartmiddag::storage::config::parse_env_or;
use kaartmiddag::storage::{StorageConfig, StoreKind};
use kaartmiddag::BuiltinNames;
use std::path::PathBuf;

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub store: Option<StoreKind>,
    pub database_url: Option<String>,
}

/// Complete CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Storage backend configuration
    pub storage: StorageConfig,
    /// Table capacities and shuffling for bulk seating
    pub seating: SeatingConfig,
    /// JSON file with the built-in name lists
    pub names_file: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if the store is unknown or values are out of range
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let mut storage = StorageConfig::load_env().map_err(|err| ConfigError::Invalid {
            var: "KM_STORE".to_string(),
            reason: err.to_string(),
        })?;

        if let Some(kind) = overrides.store {
            storage.kind = kind;
        }
        if let Some(path) = overrides.data_file {
            storage.data_file = path;
        }
        if let Some(url) = overrides.database_url {
            storage.database.database_url = Some(url);
        }

        let seating = SeatingConfig {
            jokeren_capacity: parse_env_or("KM_TABLE_CAPACITY_JOKEREN", DEFAULT_TABLE_CAPACITY),
            rikken_capacity: parse_env_or("KM_TABLE_CAPACITY_RIKKEN", DEFAULT_TABLE_CAPACITY),
            shuffle: parse_env_or("KM_SHUFFLE_SEATS", true),
        };

        let names_file = std::env::var("KM_NAMES_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let config = CliConfig {
            storage,
            seating,
            names_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var, capacity) in [
            ("KM_TABLE_CAPACITY_JOKEREN", self.seating.jokeren_capacity),
            ("KM_TABLE_CAPACITY_RIKKEN", self.seating.rikken_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }
            if capacity > MAX_TABLE_CAPACITY {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: format!("Must be at most {MAX_TABLE_CAPACITY}"),
                });
            }
        }

        if self.storage.kind == StoreKind::Postgres && self.storage.database.database_url.is_none()
        {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Set it in .env or pass --db-url postgres://user@host/db".to_string(),
            });
        }

        self.storage.validate().map_err(|err| ConfigError::Invalid {
            var: "DB_MIN_CONNECTIONS".to_string(),
            reason: err.to_string(),
        })
    }

    /// Built-in name lists, empty when no names file is configured
    pub fn builtin_names(&self) -> Result<BuiltinNames, ConfigError> {
        let Some(path) = &self.names_file else {
            return Ok(BuiltinNames::default());
        };

        let invalid = |reason: String| ConfigError::Invalid {
            var: "KM_NAMES_FILE".to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|err| invalid(format!("{}: {err}", path.display())))?;
        serde_json::from_str(&raw).map_err(|err| invalid(format!("{}: {err}", path.display())))
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
