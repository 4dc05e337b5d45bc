use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::debug;

use board_types::api::{MessagesResponse, SendMessageRequest, SendMessageResponse};
use board_types::models::Message;

use crate::error::{AppError, SEND_FIELDS_REQUIRED};
use crate::state::{AppState, with_db};

/// POST /send
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let Json(req) = payload.map_err(|r| AppError::from_payload(r, SEND_FIELDS_REQUIRED))?;

    let (username, message) = match (req.username, req.message) {
        (Some(u), Some(m)) if !u.is_empty() && !m.is_empty() => (u, m),
        _ => return Err(AppError::Validation(SEND_FIELDS_REQUIRED)),
    };

    let row = with_db(&state, move |db| db.insert_message(&username, &message)).await?;
    debug!("Message {} stored for {}", row.id, row.username);

    Ok(Json(SendMessageResponse {
        success: true,
        message: Message::from(row),
    }))
}

/// GET /messages
pub async fn get_messages(
    State(state): State<AppState>,
) -> Result<Json<MessagesResponse>, AppError> {
    let rows = with_db(&state, |db| db.get_messages()).await?;

    Ok(Json(MessagesResponse {
        messages: rows.into_iter().map(Message::from).collect(),
    }))
}
