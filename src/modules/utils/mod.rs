// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use super::error::code::ErrorCode;

pub mod shutdown;

#[macro_export]
macro_rules! draftmailer_version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}

#[macro_export]
macro_rules! utc_now {
    () => {{
        use chrono::Utc;
        Utc::now().timestamp_millis()
    }};
}

#[macro_export]
macro_rules! raise_error {
    ($msg:expr, $code:expr) => {
        $crate::modules::error::RelayError::Generic {
            message: $msg,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}

#[macro_export]
macro_rules! raise_validation_error {
    ($errors:expr) => {
        $crate::modules::error::RelayError::Validation {
            errors: $errors,
            location: snafu::Location::default(),
        }
    };
}

#[macro_export]
macro_rules! base64_decode_standard {
    ($payload:expr) => {{
        use base64::{engine::general_purpose::STANDARD, *};
        STANDARD.decode($payload)
    }};
}

#[macro_export]
macro_rules! validate_email {
    ($email:expr) => {{
        $crate::modules::utils::validate_email($email)
    }};
}

pub fn validate_email(email: &str) -> crate::modules::error::RelayResult<()> {
    use std::str::FromStr;
    let email_address = email_address::EmailAddress::from_str(email).map_err(|_| {
        raise_error!(
            format!("Invalid email format : {}", email),
            ErrorCode::InvalidParameter
        )
    })?;
    if email != email_address.email() {
        return Err(raise_error!(
            format!("Invalid email format: {}", email),
            ErrorCode::InvalidParameter
        ));
    }
    Ok(())
}

/// Returns the part after the last `@`, if any.
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}
