//! Maps [`Error`] onto HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl Error {
    /// HTTP status and machine-readable code for this error.
    #[must_use]
    pub const fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. }
            | Self::InvalidState { .. }
            | Self::InvalidDateRange { .. }
            | Self::InvalidAmount { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::ProfileNotFound { .. } => (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND"),
            Self::Config { .. } | Self::Database(_) | Self::DrawExhausted { .. } | Self::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the logs
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Internal server error");
            "Something went wrong on our side".to_string()
        } else {
            self.to_string()
        };

        let body = ApiErrorResponse {
            error: code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EventStatus;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                Error::InvalidState {
                    action: "draw names".to_string(),
                    required: "PENDING".to_string(),
                    actual: EventStatus::Drawn,
                },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (Error::InvalidAmount { amount: -1.0 }, StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (Error::forbidden("no"), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (Error::not_found("Event", 1), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                Error::ProfileNotFound {
                    subject: "abc".to_string(),
                },
                StatusCode::NOT_FOUND,
                "PROFILE_NOT_FOUND",
            ),
            (Error::Unauthenticated, StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            (
                Error::DrawExhausted { attempts: 3 },
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_and_code(), (status, code), "{error}");
        }
    }

    #[test]
    fn test_internal_message_hidden() {
        let response = Error::Config {
            message: "secret path".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
