use crate::Database;
use crate::models::{MarkReadOutcome, MessageRow};
use anyhow::Result;
use board_types::models::timestamp_now;
use rusqlite::{Connection, ErrorCode};
use tracing::{debug, warn};

impl Database {
    // -- Messages --

    /// Appends a message. The timestamp is taken while holding the writer so
    /// timestamp order follows id order.
    pub fn insert_message(&self, username: &str, message: &str) -> Result<MessageRow> {
        self.with_conn_mut(|conn| {
            let timestamp = timestamp_now();
            conn.execute(
                "INSERT INTO messages (username, message, timestamp) VALUES (?1, ?2, ?3)",
                (username, message, &timestamp),
            )?;
            Ok(MessageRow {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                message: message.to_string(),
                timestamp,
            })
        })
    }

    /// Full history, oldest first.
    pub fn get_messages(&self) -> Result<Vec<MessageRow>> {
        self.with_conn(query_messages)
    }

    // -- Read tracking --

    /// Messages written by someone other than `user` that `user` has no
    /// receipt for. An empty user never touches the database.
    pub fn unread_count(&self, user: &str) -> Result<i64> {
        if user.is_empty() {
            return Ok(0);
        }

        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*)
                 FROM messages m
                 WHERE m.username != ?1
                   AND NOT EXISTS (
                       SELECT 1 FROM user_message_reads r
                       WHERE r.user_id = ?1 AND r.message_id = m.id
                   )",
                [user],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    /// Records a receipt for every id. Inserts are independent: an id that
    /// fails a constraint is skipped and the rest still go through.
    pub fn mark_read(&self, user: &str, message_ids: &[i64]) -> Result<MarkReadOutcome> {
        self.with_conn_mut(|conn| {
            let mut stmt = conn.prepare_cached(
                "INSERT OR IGNORE INTO user_message_reads (user_id, message_id) VALUES (?1, ?2)",
            )?;

            let mut outcome = MarkReadOutcome::default();
            for &message_id in message_ids {
                match stmt.execute((user, message_id)) {
                    Ok(0) => outcome.already_read += 1,
                    Ok(_) => outcome.marked += 1,
                    Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
                        warn!("Skipping read receipt ({}, {}): {}", user, message_id, e);
                        outcome.skipped += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            debug!(
                "mark_read for {}: {} marked, {} already read, {} skipped",
                user, outcome.marked, outcome.already_read, outcome.skipped
            );
            Ok(outcome)
        })
    }
}

fn query_messages(conn: &Connection) -> Result<Vec<MessageRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, message, timestamp FROM messages ORDER BY id ASC")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                username: row.get(1)?,
                message: row.get(2)?,
                timestamp: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use tempfile::TempDir;

    fn open_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("chat.db"), 2).unwrap();
        (dir, db)
    }

    fn receipt_count(db: &Database, user: &str) -> i64 {
        db.with_conn(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM user_message_reads WHERE user_id = ?1",
                [user],
                |row| row.get(0),
            )?)
        })
        .unwrap()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (_dir, db) = open_db();
        assert!(db.get_messages().unwrap().is_empty());
    }

    #[test]
    fn messages_come_back_in_send_order() {
        let (_dir, db) = open_db();
        let mut last_id = 0;
        for i in 0..5 {
            let row = db.insert_message("alice", &format!("msg {i}")).unwrap();
            assert!(row.id > last_id);
            last_id = row.id;
        }

        let rows = db.get_messages().unwrap();
        assert_eq!(rows.len(), 5);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.message, format!("msg {i}"));
        }
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn insert_returns_stored_row() {
        let (_dir, db) = open_db();
        let sent = db.insert_message("bob", "yo").unwrap();
        let rows = db.get_messages().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, sent.id);
        assert_eq!(rows[0].username, "bob");
        assert_eq!(rows[0].message, "yo");
        assert_eq!(rows[0].timestamp, sent.timestamp);
    }

    #[test]
    fn unread_excludes_own_and_read_messages() {
        let (_dir, db) = open_db();
        db.insert_message("alice", "hi").unwrap();
        let bob = db.insert_message("bob", "yo").unwrap();

        assert_eq!(db.unread_count("alice").unwrap(), 1);
        assert_eq!(db.unread_count("bob").unwrap(), 1);

        db.mark_read("alice", &[bob.id]).unwrap();
        assert_eq!(db.unread_count("alice").unwrap(), 0);
        assert_eq!(db.unread_count("bob").unwrap(), 1);
    }

    #[test]
    fn empty_user_has_nothing_unread() {
        let (_dir, db) = open_db();
        db.insert_message("alice", "hi").unwrap();
        assert_eq!(db.unread_count("").unwrap(), 0);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let (_dir, db) = open_db();
        let a = db.insert_message("bob", "one").unwrap();
        let b = db.insert_message("bob", "two").unwrap();

        let first = db.mark_read("carol", &[a.id, b.id]).unwrap();
        assert_eq!(first.marked, 2);
        let second = db.mark_read("carol", &[a.id, b.id]).unwrap();
        assert_eq!(second.marked, 0);
        assert_eq!(second.already_read, 2);

        assert_eq!(receipt_count(&db, "carol"), 2);
    }

    #[test]
    fn unknown_id_does_not_block_the_batch() {
        let (_dir, db) = open_db();
        let a = db.insert_message("bob", "one").unwrap();
        let b = db.insert_message("bob", "two").unwrap();

        let outcome = db.mark_read("carol", &[a.id, 9999, b.id]).unwrap();
        assert_eq!(outcome.marked, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(db.unread_count("carol").unwrap(), 0);
    }

    #[test]
    fn migrations_are_rerunnable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.db");
        {
            let db = Database::open(&path, 1).unwrap();
            db.insert_message("alice", "survives").unwrap();
            db.with_conn_mut(migrations::run).unwrap();
        }

        let db = Database::open(&path, 1).unwrap();
        let rows = db.get_messages().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].message, "survives");
    }

    #[test]
    fn zero_readers_is_clamped() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("chat.db"), 0).unwrap();
        assert_eq!(db.reader_pool_size(), 1);
        assert!(db.get_messages().unwrap().is_empty());
    }
}
