// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::http::StatusCode;
use poem_openapi::Enum;

#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Client-side errors (10000–10999)
    InvalidParameter = 10000,
    ValidationFailed = 10010,
    ForbiddenSender = 10020,
    InvalidAttachment = 10030,
    MethodNotAllowed = 10090,

    // Resource errors (30000–30999)
    ResourceNotFound = 30000,

    // Mail service errors (50000–50999)
    SmtpCommandFailed = 50030,
    SmtpConnectionFailed = 50040,

    // Internal system errors (70000–70999)
    InternalError = 70000,
    UnhandledPoemError = 70010,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::ForbiddenSender
            | ErrorCode::InvalidAttachment => StatusCode::BAD_REQUEST,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::SmtpCommandFailed
            | ErrorCode::SmtpConnectionFailed
            | ErrorCode::InternalError
            | ErrorCode::UnhandledPoemError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
