//! SQLite connection wrapper (one connection per CLI invocation).

use rusqlite::{Connection, Result, Transaction};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open (or create) the database file with foreign keys enforced.
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Start an all-or-nothing unit of work.
    ///
    /// Dropping the returned handle without calling `commit()` rolls back
    /// every statement executed through it.
    pub fn begin(&mut self) -> Result<Transaction<'_>> {
        self.conn.transaction()
    }
}
