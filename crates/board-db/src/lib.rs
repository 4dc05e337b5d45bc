pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

pub const DEFAULT_READER_POOL_SIZE: usize = 4;

/// SQLite handle with a reader/writer split: one writer connection and a
/// small round-robin pool of read-only connections. WAL lets readers run
/// while the writer commits.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and brings the
    /// schema up to date before any reader is opened.
    pub fn open(path: &Path, reader_pool_size: usize) -> Result<Self> {
        let writer = Connection::open(path)?;

        let mode: String =
            writer.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        writer.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&writer)?;

        let pool_size = reader_pool_size.max(1);
        let mut readers = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (journal_mode={}, 1 writer + {} readers)",
            path.display(),
            mode,
            pool_size
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    /// Runs `f` on the next reader connection. The guard is dropped when `f`
    /// returns, whether it succeeded or not.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        f(&*acquire(&self.readers[idx], "reader")?)
    }

    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&*acquire(&self.writer, "writer")?)
    }

    pub fn reader_pool_size(&self) -> usize {
        self.readers.len()
    }
}

fn acquire<'a>(slot: &'a Mutex<Connection>, role: &str) -> Result<MutexGuard<'a, Connection>> {
    slot.lock()
        .map_err(|e| anyhow::anyhow!("Database {} connection poisoned: {}", role, e))
}
