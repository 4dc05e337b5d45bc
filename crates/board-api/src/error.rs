use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use board_types::api::ErrorResponse;

pub const SEND_FIELDS_REQUIRED: &str = "Username and message required";
pub const MARK_READ_FIELDS_REQUIRED: &str = "User and message_ids required";

#[derive(Error, Debug)]
pub enum AppError {
    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(&'static str),

    #[error("{}", .0.body_text())]
    MalformedPayload(#[from] JsonRejection),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl AppError {
    /// JSON that parsed but does not fit the request shape (`null`, a number
    /// where a string belongs) is reported as missing fields.
    pub fn from_payload(rejection: JsonRejection, required: &'static str) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => AppError::Validation(required),
            other => AppError::MalformedPayload(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status.is_server_error() {
            error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn failed_blocking_task_is_a_500() {
        let handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();
        let join_err = handle.await.unwrap_err();

        let (status, body) = render(AppError::from(join_err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn storage_detail_stays_out_of_the_body() {
        let err = AppError::from(anyhow::anyhow!("disk I/O error at /var/lib/board"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "success": false, "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn validation_is_a_400_with_its_message() {
        let (status, body) = render(AppError::Validation(SEND_FIELDS_REQUIRED)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "success": false, "error": SEND_FIELDS_REQUIRED }));
    }
}
