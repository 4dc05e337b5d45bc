use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{health, messages, reads};

/// Every route of the board, open to any origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/send", post(messages::send_message))
        .route("/messages", get(messages::get_messages))
        .route("/unread", get(reads::unread_count))
        .route("/mark_read", post(reads::mark_read))
        .route("/health", get(health::health))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
