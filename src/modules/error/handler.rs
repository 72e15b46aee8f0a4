// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, ApiError, ApiErrorResponse, FieldError, RelayError};
use poem::IntoResponse;
use poem_openapi::payload::Json;

pub async fn error_handler(error: poem::Error) -> impl poem::IntoResponse {
    if error.is::<RelayError>() {
        return error.into_response();
    }

    // A body that cannot be parsed into the request schema is reported the same
    // way as a body that parsed but failed validation.
    if error.is::<poem::error::ParseJsonError>()
        || error.is::<poem_openapi::error::ParseRequestPayloadError>()
    {
        let api_error = ApiError::validation(
            vec![FieldError::new("body", error.to_string())],
            ErrorCode::ValidationFailed as u32,
        );
        return ApiErrorResponse::Generic(ErrorCode::ValidationFailed.status(), Json(api_error))
            .into_response();
    }

    let error_mapping = [
        (
            error.is::<poem::error::NotFoundError>(),
            ErrorCode::ResourceNotFound,
        ),
        (
            error.is::<poem::error::ParsePathError>()
                || error.is::<poem::error::ParseTypedHeaderError>()
                || error.is::<poem::error::ParseQueryError>()
                || error.is::<poem_openapi::error::ContentTypeError>()
                || error.is::<poem_openapi::error::ParseParamError>()
                || error.is::<poem_openapi::error::ParsePathError>(),
            ErrorCode::InvalidParameter,
        ),
        (
            error.is::<poem::error::MethodNotAllowedError>(),
            ErrorCode::MethodNotAllowed,
        ),
    ];

    // Find the first matching error type
    if let Some((_, error_code)) = error_mapping.iter().find(|(condition, _)| *condition) {
        let api_error = ApiError::new_with_error_code(error.to_string(), *error_code as u32);
        let mut response =
            ApiErrorResponse::Generic(error_code.status(), Json(api_error)).into_response();
        response.set_status(error.status());
        return response;
    }

    if error.has_source() {
        let api_error =
            ApiError::new_with_error_code(error.to_string(), ErrorCode::UnhandledPoemError as u32);
        let mut response =
            ApiErrorResponse::Generic(ErrorCode::UnhandledPoemError.status(), Json(api_error))
                .into_response();
        response.set_status(error.status());
        response
    } else {
        error.into_response()
    }
}
