//! context
//!
//! The execution context shared by every subcommand.
//!
//! # Invariants
//!
//! - Built once per process by the entry point, after global options are
//!   parsed and before any subcommand body runs
//! - Never mutated afterwards; subcommands only receive `&Context`
//! - Never partially built: construction takes a ready backend

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::ParserBinding;
use crate::storage::Database;

/// Errors from assembling the execution context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The repository root is missing or not a directory.
    #[error("invalid value '{}' for '--repository': not an existing directory", .0.display())]
    RepositoryNotFound(PathBuf),
}

/// Execution context for subcommands.
///
/// Bundles the repository root, the storage backend and the parser binding.
/// Fields are private so that a subcommand can read them but never replace
/// them.
pub struct Context {
    repository: PathBuf,
    database: Box<dyn Database>,
    parser: ParserBinding,
}

impl Context {
    /// Create a context from fully constructed parts.
    pub fn new(repository: PathBuf, database: Box<dyn Database>, parser: ParserBinding) -> Self {
        Self {
            repository,
            database,
            parser,
        }
    }

    /// Repository root, an existing directory when built by the entry point.
    pub fn repository(&self) -> &Path {
        &self.repository
    }

    /// Storage backend.
    pub fn database(&self) -> &dyn Database {
        self.database.as_ref()
    }

    /// Parser every subcommand must use for analysis output.
    pub fn parser(&self) -> ParserBinding {
        self.parser
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("repository", &self.repository)
            .field("engine", &self.database.engine())
            .field("database", &self.database.name())
            .field("parser", &self.parser)
            .finish()
    }
}
