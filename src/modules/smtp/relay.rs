// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::RelayResult;
use crate::modules::smtp::client::{RelaySmtpClient, Sender};
use crate::modules::smtp::config::{SmtpConfig, TransportMode};
use crate::modules::smtp::request::builder::OutgoingEmail;
use crate::raise_error;
use mail_send::{Credentials, SmtpClientBuilder};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the SMTP server accepted for a single send. Every field is known locally
/// once the transaction succeeds; the server's final reply text is not included.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct DeliveryReport {
    /// The `Message-ID` header of the sent message.
    pub message_id: String,
    /// Envelope sender (`MAIL FROM`).
    pub sender: String,
    /// Envelope recipients (`RCPT TO`), including Bcc addresses.
    pub recipients: Vec<String>,
    /// The relay that accepted the message, as `host:port`.
    pub server: String,
    /// How the connection was secured.
    pub mode: TransportMode,
}

pub struct SmtpRelay;

impl SmtpRelay {
    /// Opens a fresh connection, sends `email` once and closes the connection.
    /// There is no pooling and no retry.
    pub async fn deliver(config: &SmtpConfig, email: &OutgoingEmail) -> RelayResult<DeliveryReport> {
        let mode = config.transport_mode();
        let mut client = Self::connect(config, mode).await?;

        client.send_email(email.to_message()).await?;
        info!(
            server = %config.server(),
            transport = %mode,
            message_id = %email.message_id,
            recipients = email.envelope.recipients.len(),
            "message accepted by SMTP server"
        );

        if let Err(e) = client.quit().await {
            warn!(server = %config.server(), "SMTP QUIT failed after delivery: {}", e);
        }

        Ok(DeliveryReport {
            message_id: format!("<{}>", email.message_id),
            sender: email.envelope.from.clone(),
            recipients: email.envelope.recipients.clone(),
            server: config.server(),
            mode,
        })
    }

    async fn connect(config: &SmtpConfig, mode: TransportMode) -> RelayResult<RelaySmtpClient> {
        let mut builder =
            SmtpClientBuilder::new(config.host.clone(), config.port).timeout(config.timeout);
        if let Some((username, password)) = config.credentials() {
            builder = builder.credentials(Credentials::new(username, password));
        }

        let connection_failed = |e: mail_send::Error| {
            raise_error!(
                format!("Failed to send email: {}", e),
                ErrorCode::SmtpConnectionFailed
            )
        };

        let client = match mode {
            TransportMode::ImplicitTls => {
                let client = builder
                    .implicit_tls(true)
                    .connect()
                    .await
                    .map_err(connection_failed)?;
                RelaySmtpClient::Tls(client)
            }
            TransportMode::StartTls => {
                let client = builder
                    .implicit_tls(false)
                    .connect()
                    .await
                    .map_err(connection_failed)?;
                RelaySmtpClient::Tls(client)
            }
            TransportMode::Plain => {
                let client = builder
                    .connect_plain()
                    .await
                    .map_err(connection_failed)?;
                RelaySmtpClient::Plain(client)
            }
        };

        Ok(client)
    }
}
