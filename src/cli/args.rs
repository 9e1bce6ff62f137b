//! cli::args
//!
//! Global option definitions and resolution.
//!
//! # Global Flags
//!
//! These flags come before the subcommand name:
//! - `--repository` / `-r <path>`: Repository the analysis ran on
//! - `--database-name` / `--dbname <name>`: Database file or logical name
//! - `--database-engine` / `--database <engine>`: `sqlite` or `memory`
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Only log errors
//!
//! Subcommand options are declared by each command in
//! [`crate::cli::commands`], never here.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Command};

use crate::config::Config;
use crate::context::ContextError;
use crate::logging::Verbosity;
use crate::storage::DatabaseEngine;

/// Name of the binary and root command.
pub const BIN_NAME: &str = "sapp";

/// Options shared by every invocation.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Repository root the analysis ran on [default: current directory]
    #[arg(long, short = 'r', value_name = "PATH")]
    pub repository: Option<PathBuf>,

    /// Database file (sqlite) or logical name (memory) [default: sapp.db]
    #[arg(long = "database-name", visible_alias = "dbname", value_name = "NAME")]
    pub database_name: Option<String>,

    /// Database engine to use [default: sqlite]
    #[arg(
        long = "database-engine",
        visible_alias = "database",
        value_enum,
        value_name = "ENGINE"
    )]
    pub database_engine: Option<DatabaseEngine>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Global options after defaults and config have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Repository root.
    pub repository: PathBuf,
    /// Database file or logical name.
    pub database_name: String,
    /// Storage engine.
    pub database_engine: DatabaseEngine,
}

impl GlobalArgs {
    /// Logging verbosity requested by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Apply config file values and defaults.
    ///
    /// Flags override the config file, which overrides built-in defaults.
    ///
    /// # Errors
    ///
    /// Fails if the current directory is unavailable, the repository is not
    /// an existing directory, or a config file is present but invalid.
    pub fn resolve(&self) -> Result<Settings> {
        let repository = match &self.repository {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        if !repository.is_dir() {
            return Err(ContextError::RepositoryNotFound(repository).into());
        }

        let loaded = Config::load(&repository).context("Failed to load configuration")?;
        let config = loaded.config;

        Ok(Settings {
            database_name: self
                .database_name
                .clone()
                .unwrap_or_else(|| config.database_name().to_string()),
            database_engine: self
                .database_engine
                .unwrap_or_else(|| config.database_engine()),
            repository,
        })
    }
}

/// The root command without any subcommands attached.
pub fn root_command() -> Command {
    let cmd = Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Post-process static taint-flow analysis results")
        .subcommand_required(true)
        .arg_required_else_help(true);
    GlobalArgs::augment_args(cmd)
}
