use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::mailer::MailError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Pipeline stages never produce one of these: they degrade to fallbacks.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid document: {0}")]
    Ingestion(#[from] IngestError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email error: {0}")]
    Mail(#[from] MailError),

    #[error("Email delivery is not configured")]
    MailDisabled,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Ingestion(e) => {
                tracing::warn!("Rejected upload: {e}");
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_DOCUMENT",
                    "Invalid PDF file".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Mail(e) => {
                tracing::error!("Email error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMAIL_ERROR",
                    "Failed to send invitations".to_string(),
                )
            }
            AppError::MailDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "EMAIL_DISABLED",
                "Email delivery is not configured".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_failure_is_bad_request() {
        let response = AppError::from(IngestError::NotPdf).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("RFP not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_mail_disabled_is_service_unavailable() {
        assert_eq!(
            AppError::MailDisabled.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
