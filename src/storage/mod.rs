//! storage
//!
//! Storage backend abstraction and backend selection.
//!
//! # Architecture
//!
//! Subcommands talk to storage through the [`Database`] trait. The concrete
//! backend is chosen once, by the entry point, from a [`DatabaseEngine`]:
//!
//! - [`DatabaseEngine::Sqlite`]: durable, file-backed SQLite database
//! - [`DatabaseEngine::Memory`]: transient, process-local database
//!
//! Use [`create_database`] instead of constructing backends directly so that
//! engine selection stays in one place.
//!
//! # Example
//!
//! ```
//! use sapp::storage::{create_database, DatabaseEngine};
//!
//! let db = create_database(DatabaseEngine::Memory, "scratch", true).unwrap();
//! assert_eq!(db.engine(), DatabaseEngine::Memory);
//! assert_eq!(db.name(), "scratch");
//! ```

mod sqlite;
mod traits;

pub use sqlite::SqliteDatabase;
pub use traits::{Database, QueryResult, StorageError};

use serde::{Deserialize, Serialize};

/// Supported storage engines.
///
/// This is a closed set: option and config parsing reject anything else
/// before a backend is ever created.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseEngine {
    /// Durable on-disk SQLite database
    #[default]
    Sqlite,
    /// Transient in-memory database
    Memory,
}

impl DatabaseEngine {
    /// All engines, in help order.
    pub fn all() -> &'static [DatabaseEngine] {
        &[DatabaseEngine::Sqlite, DatabaseEngine::Memory]
    }

    /// The engine name as accepted on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseEngine::Sqlite => "sqlite",
            DatabaseEngine::Memory => "memory",
        }
    }
}

impl std::fmt::Display for DatabaseEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a storage backend for the given engine.
///
/// `name` is a file path for [`DatabaseEngine::Sqlite`] and a logical label
/// for [`DatabaseEngine::Memory`]. When `assertions` is set, the backend runs
/// its consistency checks on open and after every write, failing instead of
/// continuing with suspect data.
///
/// # Errors
///
/// Propagates open and integrity failures from the backend.
pub fn create_database(
    engine: DatabaseEngine,
    name: &str,
    assertions: bool,
) -> Result<Box<dyn Database>, StorageError> {
    match engine {
        DatabaseEngine::Sqlite | DatabaseEngine::Memory => {
            Ok(Box::new(SqliteDatabase::open(engine, name, assertions)?))
        }
    }
}
