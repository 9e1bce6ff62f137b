//! config
//!
//! Optional configuration file supplying defaults for the global options.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults (`sapp.db`, `sqlite`)
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Locations
//!
//! Searched in order, first hit wins:
//! 1. `$SAPP_CONFIG` if set
//! 2. `<repository>/.sapp.toml`
//!
//! # Example
//!
//! ```toml
//! database_name = "results/sapp.db"
//! database_engine = "sqlite"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::DatabaseEngine;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SAPP_CONFIG";

/// Config file name looked up in the repository root.
pub const REPO_CONFIG_FILE: &str = ".sapp.toml";

/// Database file used when neither flag nor config names one.
pub const DEFAULT_DATABASE_NAME: &str = "sapp.db";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default database name or path
    pub database_name: Option<String>,

    /// Default storage engine
    pub database_engine: Option<DatabaseEngine>,
}

/// Result of loading configuration.
#[derive(Debug, Default)]
pub struct ConfigLoadResult {
    /// The loaded configuration (defaults if no file was found).
    pub config: Config,
    /// The file the configuration came from, if any.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for a repository.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. A missing file is not an error.
    pub fn load(repository: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(explicit.as_deref(), repository)
    }

    /// Load configuration from an explicit path, falling back to the
    /// repository file.
    pub fn load_from(
        explicit: Option<&Path>,
        repository: &Path,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let candidates = explicit
            .map(Path::to_path_buf)
            .into_iter()
            .chain(std::iter::once(repository.join(REPO_CONFIG_FILE)));

        for path in candidates {
            if path.is_file() {
                let config = Self::read(&path)?;
                config.validate()?;
                tracing::debug!(path = %path.display(), "loaded config");
                return Ok(ConfigLoadResult {
                    config,
                    path: Some(path),
                });
            }
        }

        Ok(ConfigLoadResult::default())
    }

    fn read(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.database_name {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "database_name must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Database name, defaulting to `sapp.db`.
    pub fn database_name(&self) -> &str {
        self.database_name
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_NAME)
    }

    /// Storage engine, defaulting to the durable engine.
    pub fn database_engine(&self) -> DatabaseEngine {
        self.database_engine.unwrap_or_default()
    }
}
