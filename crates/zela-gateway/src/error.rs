// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use zela_core::ZelaError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// An HTTP status plus a client-safe message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ZelaError> for ApiError {
    fn from(err: ZelaError) -> Self {
        match err {
            ZelaError::NotFound { resource, id } => {
                Self::new(StatusCode::NOT_FOUND, format!("{resource} {id} not found"))
            }
            ZelaError::Forbidden { resource, id } => Self::new(
                StatusCode::FORBIDDEN,
                format!("{resource} {id} belongs to another user"),
            ),
            ZelaError::Unauthorized => Self::unauthorized(),
            ZelaError::Validation(message) => Self::bad_request(message),
            other => {
                tracing::error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_errors_map_to_distinct_statuses() {
        let missing = ApiError::from(ZelaError::NotFound {
            resource: "transaction",
            id: "7".into(),
        });
        let foreign = ApiError::from(ZelaError::Forbidden {
            resource: "transaction",
            id: "7".into(),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(ZelaError::Internal("db path /var/secret".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal error");
    }

    #[test]
    fn validation_is_a_bad_request() {
        let err = ApiError::from(ZelaError::Validation("amount must be positive".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "amount must be positive");
    }
}
