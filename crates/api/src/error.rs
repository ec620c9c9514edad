//! Error responses for API handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use hourglass_core::leave::LeaveError;
use hourglass_shared::AppError;

/// Handler error rendered as `{ "error": <code>, "message": <text> }`.
///
/// Storage and internal failures are logged and answered with a generic
/// message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with `message`.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 403 with `message`.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<LeaveError> for ApiError {
    fn from(e: LeaveError) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_internal() {
            error!(error = %self.0, "request failed");
            "An error occurred".to_string()
        } else {
            warn!(error = %self.0, code = self.0.error_code(), "request rejected");
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}
