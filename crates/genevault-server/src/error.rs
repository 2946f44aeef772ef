//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::response::ErrorResponse;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "A database error occurred"),
                )
            },
            AppError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", message.clone()),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message.clone()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        body.into_response_with(status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_database_message_is_generic() {
        let (_, body) = AppError::Database(sqlx::Error::PoolTimedOut).status_and_body();
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "A database error occurred");
    }

    #[test]
    fn test_bad_request_code() {
        let (_, body) = AppError::BadRequest("Invalid JSON".into()).status_and_body();
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert_eq!(body.error.message, "Invalid JSON");
    }

    #[test]
    fn test_validation_message_passes_through() {
        let (_, body) = AppError::Validation("No genes provided".into()).status_and_body();
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert_eq!(body.error.message, "No genes provided");
    }
}
