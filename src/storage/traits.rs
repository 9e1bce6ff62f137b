//! storage::traits
//!
//! Storage backend trait definition.
//!
//! # Design
//!
//! The `Database` trait is the capability set subcommands rely on: run a
//! query, persist trace records, and report which engine it is. It says
//! nothing about schema; the record store behind it is deliberately small.
//!
//! Implementations must be thread-safe (Send + Sync). The execution context
//! is shared by reference and never mutated, so any interior state (such as
//! a connection) has to carry its own synchronization.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::DatabaseEngine;
use crate::parser::TraceRecord;

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be opened.
    #[error("failed to open {engine} database '{name}': {source}")]
    Open {
        engine: DatabaseEngine,
        name: String,
        source: rusqlite::Error,
    },

    /// The parent directory of a durable database does not exist.
    #[error("database directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    /// A query failed.
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// An internal consistency check failed.
    #[error("storage assertion failed: {0}")]
    AssertionFailed(String),

    /// The connection lock was poisoned by a panicking reader.
    #[error("database connection is poisoned")]
    Poisoned,
}

/// Rows returned by [`Database::query`].
///
/// Every value is rendered as text; `NULL` becomes an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// One entry per row, aligned with `columns`.
    pub rows: Vec<Vec<String>>,
}

/// Trait for storage backends.
///
/// # Example
///
/// ```ignore
/// use sapp::storage::{create_database, Database, DatabaseEngine};
///
/// let db = create_database(DatabaseEngine::Memory, "scratch", true)?;
/// let stored = db.persist(&records)?;
/// let result = db.query("SELECT kind, COUNT(*) FROM trace_records GROUP BY kind")?;
/// ```
pub trait Database: Send + Sync + fmt::Debug {
    /// The engine this backend was created for.
    fn engine(&self) -> DatabaseEngine;

    /// The location (durable) or logical name (memory) of this backend.
    fn name(&self) -> &str;

    /// Whether internal consistency checks run on every write.
    fn assertions_enabled(&self) -> bool;

    /// Execute a SQL statement and collect its rows.
    fn query(&self, sql: &str) -> Result<QueryResult, StorageError>;

    /// Persist trace records, returning how many were written.
    fn persist(&self, records: &[TraceRecord]) -> Result<usize, StorageError>;

    /// Number of trace records currently stored.
    fn record_count(&self) -> Result<u64, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StorageError::MissingDirectory(PathBuf::from("/nope"));
        assert!(err.to_string().contains("/nope"));

        let err = StorageError::AssertionFailed("row count mismatch".into());
        assert!(err.to_string().contains("assertion"));
        assert!(err.to_string().contains("row count mismatch"));

        let err = StorageError::Poisoned;
        assert!(err.to_string().contains("poisoned"));
    }
}
