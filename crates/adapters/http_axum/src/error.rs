//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use potbot_domain::error::PotbotError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PotbotError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(PotbotError);

impl From<PotbotError> for ApiError {
    fn from(err: PotbotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PotbotError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            PotbotError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            PotbotError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            PotbotError::Forbidden => (
                StatusCode::FORBIDDEN,
                "you do not own this plant".to_string(),
            ),
            PotbotError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            PotbotError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            PotbotError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
