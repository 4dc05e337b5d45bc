use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of `Message::timestamp`: ISO-8601, UTC, no offset suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A posted chat entry. Never modified after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub username: String,
    pub message: String,
    pub timestamp: String,
}

/// Current UTC time rendered the way messages store it.
pub fn timestamp_now() -> String {
    format_timestamp(Utc::now().naive_utc())
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
