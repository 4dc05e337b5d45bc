use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Creates the schema if it is missing. Safe to run against an existing
/// database: nothing is dropped or altered.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL,
            message     TEXT NOT NULL,
            timestamp   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_message_reads (
            user_id     TEXT NOT NULL,
            message_id  INTEGER NOT NULL,
            PRIMARY KEY (user_id, message_id),
            FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_messages_username
            ON messages(username);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
