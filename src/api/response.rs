//! Response types for the HR administration API.
//!
//! This module defines the error response structures and the mapping from
//! [`HrError`] to HTTP status codes.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::HrError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// The caller did not identify itself.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::with_details(
            "UNAUTHENTICATED",
            message,
            "Requests must carry the authenticated principal in the X-Principal-Id header",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    pub fn bad_request(error: ApiError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiError::unauthenticated(message))
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<HrError> for ApiErrorResponse {
    fn from(error: HrError) -> Self {
        let message = error.to_string();
        match error {
            HrError::Validation { field, .. } => ApiErrorResponse::bad_request(
                ApiError::with_details("VALIDATION_ERROR", message, format!("field: {}", field)),
            ),
            HrError::NoEmployeeProfile => ApiErrorResponse::bad_request(ApiError::new(
                "NO_EMPLOYEE_PROFILE",
                message,
            )),
            HrError::InvalidState { status, .. } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_STATE",
                    message,
                    format!("The request has already been {}", status),
                ))
            }
            HrError::Forbidden { .. } => {
                ApiErrorResponse::new(StatusCode::FORBIDDEN, ApiError::new("FORBIDDEN", message))
            }
            HrError::NotFound { .. } => {
                ApiErrorResponse::new(StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            HrError::NoWorkingDays { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("NO_WORKING_DAYS", message),
            ),
            HrError::Persistence { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("PERSISTENCE_ERROR", "Storage operation failed", message),
            ),
            HrError::ConfigNotFound { .. }
            | HrError::ConfigParseError { .. }
            | HrError::SeedError { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
        }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        ApiErrorResponse::bad_request(error)
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        ApiErrorResponse::bad_request(ApiError::validation_error(format!(
            "Invalid path parameter: {}",
            rejection.body_text()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (HrError::validation("name", "blank"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (HrError::NoEmployeeProfile, StatusCode::BAD_REQUEST, "NO_EMPLOYEE_PROFILE"),
            (
                HrError::InvalidState {
                    id: "x".to_string(),
                    status: "approved".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "INVALID_STATE",
            ),
            (HrError::forbidden("approve", "leave_request"), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (HrError::not_found("employee", "42"), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                HrError::NoWorkingDays { month: 2, year: 2024 },
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_WORKING_DAYS",
            ),
            (
                HrError::Persistence {
                    message: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
            ),
            (
                HrError::ConfigNotFound {
                    path: "server.yaml".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status, "{}", code);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_unauthenticated_is_401() {
        let response = ApiErrorResponse::unauthenticated("missing header");
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.error.code, "UNAUTHENTICATED");
    }
}
