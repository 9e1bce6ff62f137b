//! storage::sqlite
//!
//! SQLite-backed storage for both engines.
//!
//! The durable engine opens (or creates) a database file; the memory engine
//! opens a private in-memory connection and keeps the requested name only as
//! a label. Both share one record table and one query path.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{params, Connection};

use super::traits::{Database, QueryResult, StorageError};
use super::DatabaseEngine;
use crate::parser::TraceRecord;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS trace_records (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    kind     TEXT NOT NULL,
    callable TEXT,
    filename TEXT,
    payload  TEXT NOT NULL
);
";

const INSERT_RECORD: &str =
    "INSERT INTO trace_records (kind, callable, filename, payload) VALUES (?1, ?2, ?3, ?4)";

/// SQLite database handle.
#[derive(Debug)]
pub struct SqliteDatabase {
    engine: DatabaseEngine,
    name: String,
    assertions: bool,
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Open a database for the given engine.
    ///
    /// # Errors
    ///
    /// - `MissingDirectory` if a durable database's parent directory is absent
    /// - `Open` if SQLite refuses the location
    /// - `AssertionFailed` if assertions are on and the integrity check fails
    pub fn open(engine: DatabaseEngine, name: &str, assertions: bool) -> Result<Self, StorageError> {
        let conn = match engine {
            DatabaseEngine::Sqlite => {
                let path = Path::new(name);
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.is_dir() {
                        return Err(StorageError::MissingDirectory(parent.to_path_buf()));
                    }
                }
                Connection::open(path)
            }
            DatabaseEngine::Memory => Connection::open_in_memory(),
        }
        .map_err(|source| StorageError::Open {
            engine,
            name: name.to_string(),
            source,
        })?;

        if assertions {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            let status: String = conn.query_row("PRAGMA quick_check", [], |row| row.get(0))?;
            if status != "ok" {
                return Err(StorageError::AssertionFailed(format!(
                    "integrity check on '{}' reported: {}",
                    name, status
                )));
            }
        }

        conn.execute_batch(CREATE_TABLES)?;
        tracing::debug!(%engine, name, assertions, "opened database");

        Ok(Self {
            engine,
            name: name.to_string(),
            assertions,
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }
}

fn count_records(conn: &Connection) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM trace_records", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn render(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s,
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

impl Database for SqliteDatabase {
    fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn assertions_enabled(&self) -> bool {
        self.assertions
    }

    fn query(&self, sql: &str) -> Result<QueryResult, StorageError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(render(row.get::<_, Value>(i)?));
            }
            rows.push(values);
        }

        Ok(QueryResult { columns, rows })
    }

    fn persist(&self, records: &[TraceRecord]) -> Result<usize, StorageError> {
        let mut conn = self.lock()?;
        let before = if self.assertions {
            Some(count_records(&conn)?)
        } else {
            None
        };

        let tx = conn.transaction()?;
        {
            let mut insert = tx.prepare(INSERT_RECORD)?;
            for record in records {
                insert.execute(params![
                    record.kind,
                    record.callable,
                    record.filename,
                    record.payload.to_string(),
                ])?;
            }
        }

        // Dropping the transaction without commit rolls it back.
        if let Some(before) = before {
            let after = count_records(&tx)?;
            let expected = before + records.len() as u64;
            if after != expected {
                return Err(StorageError::AssertionFailed(format!(
                    "expected {} stored records after write, found {}",
                    expected, after
                )));
            }
        }
        tx.commit()?;

        tracing::debug!(count = records.len(), database = %self.name, "persisted records");
        Ok(records.len())
    }

    fn record_count(&self) -> Result<u64, StorageError> {
        let conn = self.lock()?;
        count_records(&conn)
    }
}
