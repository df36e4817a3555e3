use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::docs_client::auth::AuthError;
use crate::export::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized(e) => {
                tracing::warn!("Authentication failed: {e}");
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
            }
            AppError::ExportInProgress => (
                StatusCode::CONFLICT,
                "EXPORT_IN_PROGRESS",
                "Another export is still running".to_string(),
            ),
            AppError::Export(ExportError::Remote(e)) => {
                tracing::error!("Export failed: {e}");
                (StatusCode::BAD_GATEWAY, "REMOTE_ERROR", e.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Export failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    e.to_string(),
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
    use crate::docs_client::DocsError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::Unauthorized(AuthError::InteractiveUnavailable),
                StatusCode::UNAUTHORIZED,
            ),
            (AppError::ExportInProgress, StatusCode::CONFLICT),
            (
                AppError::Export(ExportError::Remote(DocsError::MissingReply("footerId"))),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::Export(ExportError::TableNotFound("doc".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
