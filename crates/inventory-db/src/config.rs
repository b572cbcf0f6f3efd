//! Runtime configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default               |
//! |---------------------------------|-----------------------|
//! | `INVENTORY_DB_PATH`             | `./inventory_dev.db`  |
//! | `INVENTORY_DB_MAX_CONNECTIONS`  | `5`                   |
//! | `INVENTORY_MAX_COMBINATIONS`    | `10000`               |

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use inventory_core::MAX_COMBINATIONS;

use crate::pool::DbConfig;

/// Inventory backend configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// Ceiling on combinations generated for one product.
    pub max_combinations: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        InventoryConfig {
            database_path: PathBuf::from("./inventory_dev.db"),
            max_connections: 5,
            max_combinations: MAX_COMBINATIONS,
        }
    }
}

impl InventoryConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = InventoryConfig::default();

        let config = InventoryConfig {
            database_path: vars
                .get("INVENTORY_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            max_connections: parse_var(&vars, "INVENTORY_DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),

            max_combinations: parse_var(&vars, "INVENTORY_MAX_COMBINATIONS")?
                .unwrap_or(defaults.max_combinations),
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "INVENTORY_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.max_combinations == 0 {
            return Err(ConfigError::InvalidValue(
                "INVENTORY_MAX_COMBINATIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database pool configuration derived from this config.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

fn parse_var<T: FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match vars.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
