// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use compose::ComposeApi;
use poem_openapi::{OpenApiService, Tags};
use send::SendMailApi;

use crate::draftmailer_version;

pub mod compose;
pub mod send;

#[derive(Tags)]
pub enum ApiTags {
    /// Relay messages through the configured SMTP server.
    SendMail,
    /// Build links that open a pre-filled message in a webmail client.
    Compose,
}

type DraftMailerOpenApi = (SendMailApi, ComposeApi);

pub fn create_openapi_service() -> OpenApiService<DraftMailerOpenApi, ()> {
    OpenApiService::new(
        (SendMailApi, ComposeApi),
        "DraftMailerApi",
        draftmailer_version!(),
    )
}
