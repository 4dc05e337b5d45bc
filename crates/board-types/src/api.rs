use serde::{Deserialize, Serialize};

use crate::models::Message;

// -- Messages --

/// Body of `POST /send`. Both fields are optional on the wire so that a
/// missing field reaches validation instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: Message,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

// -- Read tracking --

#[derive(Debug, Default, Deserialize)]
pub struct UnreadQuery {
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub unread_count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub message_ids: Option<Vec<i64>>,
}

// -- Generic --

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
