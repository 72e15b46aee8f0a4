// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Formatter;

use code::ErrorCode;
use poem::error::ResponseError;
use poem::http::StatusCode;
use poem::{Body, Response};
use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};
use snafu::{Location, Snafu};
use tracing::error;

pub mod code;
pub mod handler;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RelayError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
    #[snafu(display("Request validation failed ({} error(s))", errors.len()))]
    Validation {
        errors: Vec<FieldError>,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type RelayResult<T, E = RelayError> = std::result::Result<T, E>;

impl RelayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RelayError::Generic { code, .. } => *code,
            RelayError::Validation { .. } => ErrorCode::ValidationFailed,
        }
    }
}

/// A single violation found while validating a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct FieldError {
    /// Path of the offending field, e.g. `to[1]` or `attachments[0].name`.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ApiError {
    pub code: u32,
    /// Human-readable description of the failure.
    pub detail: String,
    /// Per-field violations, present only for validation failures.
    #[oai(skip_serializing_if_is_none)]
    pub errors: Option<Vec<FieldError>>,
}

impl From<RelayError> for ApiErrorResponse {
    fn from(error: RelayError) -> Self {
        let code = error.code();
        match error {
            RelayError::Generic {
                message, location, ..
            } => {
                tracing::error!(
                    "API error occurred: [{:#?}] {} at {:?}",
                    code,
                    message,
                    location
                );
                ApiErrorResponse::Generic(code.status(), Json(ApiError::new(message, code as u32)))
            }
            RelayError::Validation { errors, location } => {
                tracing::warn!(
                    "Request rejected: {} validation error(s) at {:?}",
                    errors.len(),
                    location
                );
                ApiErrorResponse::Generic(
                    code.status(),
                    Json(ApiError::validation(errors, code as u32)),
                )
            }
        }
    }
}

impl ApiError {
    pub fn new(detail: String, code: u32) -> Self {
        Self {
            code,
            detail,
            errors: None,
        }
    }

    pub fn validation(errors: Vec<FieldError>, code: u32) -> Self {
        Self {
            code,
            detail: "Request validation failed".into(),
            errors: Some(errors),
        }
    }

    pub fn new_with_error_code<ErrorType: std::fmt::Display>(
        error: ErrorType,
        code: u32,
    ) -> ApiError {
        Self::new(format!("{:#}", error), code)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error({}): {}", self.code, self.detail)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}

impl ResponseError for RelayError {
    fn status(&self) -> StatusCode {
        self.code().status()
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        let code = self.code();
        let body = match self {
            RelayError::Generic {
                message, location, ..
            } => {
                error!(
                    error_code = code as u32,
                    error_message = %message,
                    error_location = ?location
                );
                serde_json::json!({
                    "code": code as u32,
                    "detail": message,
                })
            }
            RelayError::Validation { errors, .. } => serde_json::json!({
                "code": code as u32,
                "detail": "Request validation failed",
                "errors": errors,
            }),
        };

        Response::builder()
            .status(self.status())
            .body(Body::from_json(body).unwrap_or_else(|_| Body::empty()))
    }
}
