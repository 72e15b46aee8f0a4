// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use poem::{FromRequest, Request, RequestBody, Result};

use crate::modules::error::code::ErrorCode;
use crate::modules::settings::cli::Settings;
use crate::modules::smtp::config::SmtpConfig;
use crate::raise_error;

/// Process-wide state shared by every request. Built once at startup, attached to
/// the route as request data and never mutated afterwards.
#[derive(Clone, Debug)]
pub struct RelayContext {
    pub smtp: Arc<SmtpConfig>,
}

impl RelayContext {
    pub fn new(settings: &Settings) -> Self {
        Self {
            smtp: Arc::new(SmtpConfig::from(settings)),
        }
    }
}

impl<'a> FromRequest<'a> for RelayContext {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        req.data::<RelayContext>().cloned().ok_or_else(|| {
            raise_error!(
                "Relay context is not attached to the route".into(),
                ErrorCode::InternalError
            )
            .into()
        })
    }
}
