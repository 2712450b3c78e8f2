//! POLYKV - Store Configuration
//! Defines tunable parameters for the database manager.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, StoreError};

/// Number of databases used when none (or an unusable count) is configured.
pub const DEFAULT_NUMBER_OF_DATABASES: u16 = 4;

/// Configuration for the database manager.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Requested number of databases. Values of 0 or 1 fall back to the default.
    pub number_of_databases: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_databases: DEFAULT_NUMBER_OF_DATABASES,
        }
    }
}

impl Config {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested number of databases.
    pub fn with_number_of_databases(mut self, count: u16) -> Self {
        self.number_of_databases = count;
        self
    }

    /// The number of databases the manager will actually allocate.
    pub fn database_count(&self) -> u16 {
        if self.number_of_databases > 1 {
            self.number_of_databases
        } else {
            DEFAULT_NUMBER_OF_DATABASES
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| StoreError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}
