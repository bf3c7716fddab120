//! # scout-db
//!
//! libSQL store for tracked profiles and their status history.
//!
//! Holds the two profile tables and the append-only `status_updates` table.
//! The transition recorder lives here: it writes the history row and the
//! profile update in one transaction, guarded by a compare-and-swap on the
//! profile's current status.
//!
//! Uses the `libsql` crate (v0.9.29) with a single local connection. Writes
//! are serialized through [`ScoutDb::lock_writes`] so concurrent refresh
//! workers never interleave transactions on that connection.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle.
pub struct ScoutDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    write_lock: Mutex<()>,
}

impl ScoutDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let scout_db = Self {
            db,
            conn,
            write_lock: Mutex::new(()),
        };
        scout_db.run_migrations().await?;
        tracing::debug!(path, "opened scout store");
        Ok(scout_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Acquire the store-wide write lock. Hold it for the whole of a write
    /// or transaction.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}
