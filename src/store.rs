//! Persistent store adapter
//!
//! The registry consumes exactly two store capabilities: execute a statement
//! with parameters, and query a single scalar row. Everything else about the
//! engine stays behind the [`Store`] trait, so tests can substitute failing
//! or counting stores and the engine can be swapped without touching the
//! registry or cache.

use parking_lot::Mutex;
use rusqlite::{Connection, ToSql};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Bounded wait on a busy database before a call fails as a [`StoreError`]
pub const STORE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persistent store failure
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite failure
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Store cannot currently serve requests
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal store contract consumed by the access registry.
///
/// Implementations must be safe for concurrent callers; statements are
/// issued from many request-handling threads at once.
pub trait Store: Send + Sync {
    /// Execute a statement, returning the number of affected rows
    fn execute(&self, statement: &str, params: &[&dyn ToSql]) -> Result<usize, StoreError>;

    /// Query a statement expected to yield a single integer scalar
    fn query_scalar(&self, statement: &str, params: &[&dyn ToSql]) -> Result<i64, StoreError>;
}

/// SQLite-backed store.
///
/// One connection guarded by a mutex; the busy timeout bounds how long a
/// call blocks on a locked database before surfacing a [`StoreError`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory store; contents vanish on drop
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(STORE_BUSY_TIMEOUT)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }
}

impl Store for SqliteStore {
    fn execute(&self, statement: &str, params: &[&dyn ToSql]) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        Ok(conn.execute(statement, params)?)
    }

    fn query_scalar(&self, statement: &str, params: &[&dyn ToSql]) -> Result<i64, StoreError> {
        let conn = self.conn.lock();
        Ok(conn.query_row(statement, params, |row| row.get(0))?)
    }
}
