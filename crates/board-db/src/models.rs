//! Row types mapped straight from SQLite, kept apart from the wire types in
//! board-types.

use board_types::models::Message;

pub struct MessageRow {
    pub id: i64,
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message {
            id: row.id,
            username: row.username,
            message: row.message,
            timestamp: row.timestamp,
        }
    }
}

/// Result of a mark-read batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarkReadOutcome {
    /// Receipts written by this call.
    pub marked: usize,
    /// Ids that already had a receipt.
    pub already_read: usize,
    /// Ids rejected by a constraint, e.g. no such message.
    pub skipped: usize,
}
