use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};

use board_types::api::{MarkReadRequest, SuccessResponse, UnreadQuery, UnreadResponse};

use crate::error::{AppError, MARK_READ_FIELDS_REQUIRED};
use crate::state::{AppState, with_db};

/// GET /unread?user=U
pub async fn unread_count(
    State(state): State<AppState>,
    Query(query): Query<UnreadQuery>,
) -> Result<Json<UnreadResponse>, AppError> {
    let user = match query.user {
        Some(user) if !user.is_empty() => user,
        _ => return Ok(Json(UnreadResponse { unread_count: 0 })),
    };

    let unread_count = with_db(&state, move |db| db.unread_count(&user)).await?;
    Ok(Json(UnreadResponse { unread_count }))
}

/// POST /mark_read. Unknown ids are skipped, not reported.
pub async fn mark_read(
    State(state): State<AppState>,
    payload: Result<Json<MarkReadRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(req) =
        payload.map_err(|r| AppError::from_payload(r, MARK_READ_FIELDS_REQUIRED))?;

    let (user, message_ids) = match (req.user, req.message_ids) {
        (Some(u), Some(ids)) if !u.is_empty() && !ids.is_empty() => (u, ids),
        _ => return Err(AppError::Validation(MARK_READ_FIELDS_REQUIRED)),
    };

    with_db(&state, move |db| db.mark_read(&user, &message_ids)).await?;
    Ok(Json(SuccessResponse::ok()))
}
