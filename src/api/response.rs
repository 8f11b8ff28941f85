//! Response types for the manday engine API.
//!
//! Every failure leaves the router as an [`ApiErrorResponse`]: a status code
//! plus a JSON `{code, message, details}` body.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

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

    /// Creates a missing parameter error response.
    pub fn missing_parameter(name: &str) -> Self {
        Self::with_details(
            "MISSING_PARAMETER",
            format!("Missing required parameter: {}", name),
            format!("Required parameter '{}' was not provided in the request", name),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::UnreadableSource {
                source_name,
                message,
            } => ApiErrorResponse::bad_request(ApiError::with_details(
                "UNREADABLE_SOURCE",
                format!("Unreadable source '{}'", source_name),
                message,
            )),
            EngineError::MissingParameter { name } => {
                ApiErrorResponse::bad_request(ApiError::missing_parameter(&name))
            }
            EngineError::InvalidDateRange { start, end } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_DATE_RANGE",
                    format!("Invalid date range: start {} is after end {}", start, end),
                    "start_date must be on or before end_date",
                ))
            }
            EngineError::DateRangeTooLong {
                start,
                end,
                max_days,
            } => ApiErrorResponse::bad_request(ApiError::with_details(
                "INVALID_DATE_RANGE",
                format!("Invalid date range: {} to {} is too long", start, end),
                format!("a range may cover at most {} days", max_days),
            )),
            EngineError::HolidayLookupFailed { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "HOLIDAY_LOOKUP_FAILED",
                    "Holiday lookup failed",
                    message,
                ),
            },
        }
    }
}
