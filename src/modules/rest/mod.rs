// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::common::error::ErrorCapture;
use crate::modules::common::log::Tracing;
use crate::modules::context::RelayContext;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::handler::error_handler;
use crate::modules::error::RelayResult;
use crate::modules::rest::public::health::get_health;
use crate::modules::settings::cli::Settings;
use crate::modules::utils::shutdown::shutdown_signal;

use super::error::ApiErrorResponse;
use crate::raise_error;
use api::create_openapi_service;
use poem::endpoint::BoxEndpoint;
use poem::get;
use poem::listener::TcpListener;
use poem::middleware::{CatchPanic, Compression, Cors};
use poem::{EndpointExt, Response, Route, Server};
use std::time::Duration;
use tracing::info;

pub mod api;
pub mod public;

pub type ApiResult<T, E = ApiErrorResponse> = std::result::Result<T, E>;

const DESCRIPTION: &str = r#"
    DraftMailer turns a structured email description into either a delivered message or a webmail link.

    - Relays messages through one configured SMTP server, with attachments, HTML alternatives and Bcc handled on the envelope.
    - Builds Gmail compose links from the same data, reducing HTML bodies to plain text.
"#;

/// Assembles the full HTTP application: OpenAPI routes, docs, health check and the
/// middleware stack. Errors from every layer are rendered as JSON.
pub fn build_route(context: RelayContext, settings: &Settings) -> BoxEndpoint<'static, Response> {
    let api_service = create_openapi_service()
        .description(DESCRIPTION)
        .summary("Relay structured email drafts through SMTP or into Gmail compose links");

    let swagger = api_service.swagger_ui();
    let scalar = api_service.scalar();
    let spec_json = api_service.spec_endpoint();

    let open_api_route = Route::new()
        .nest_no_strip("/api", api_service)
        .with(ErrorCapture)
        .with(Tracing);

    let mut cors = Cors::new()
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "OPTIONS", "HEAD"])
        .allow_headers(vec!["Content-Type", "Authorization"])
        .expose_headers(vec!["Accept"])
        .max_age(settings.draftmailer_cors_max_age);
    // No configured origin means any origin is allowed.
    if !settings.allowed_origins.is_empty() {
        cors = cors.allow_origins(settings.allowed_origins.clone());
    }

    Route::new()
        .nest("/api-docs/swagger", swagger)
        .nest("/api-docs/scalar", scalar)
        .nest("/api-docs/spec.json", spec_json)
        .at("/health", get(get_health))
        .nest_no_strip("/api", open_api_route)
        .with(cors)
        .with_if(
            settings.draftmailer_http_compression_enabled,
            Compression::new(),
        )
        .with(CatchPanic::new())
        .data(context)
        .catch_all_error(error_handler)
        .boxed()
}

pub async fn start_http_server(settings: &Settings) -> RelayResult<()> {
    let listener = TcpListener::bind((
        settings.draftmailer_bind_ip.clone(),
        settings.draftmailer_http_port,
    ));

    let context = RelayContext::new(settings);
    info!(smtp = ?context.smtp, "SMTP relay configured");
    let route = build_route(context, settings);

    let server = Server::new(listener)
        .name("DraftMailer API Service")
        .idle_timeout(Duration::from_secs(60))
        .run_with_graceful_shutdown(route, shutdown_signal(), Some(Duration::from_secs(5)));
    info!(
        "DraftMailer API Service is now running on {}:{}.",
        settings.draftmailer_bind_ip, settings.draftmailer_http_port
    );
    server
        .await
        .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::InternalError))
}
