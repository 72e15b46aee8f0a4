// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;

use mail_send::mail_builder::{headers::address::Address, mime::BodyPart, MessageBuilder};
use mail_send::smtp::message::Message;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::modules::error::{code::ErrorCode, RelayResult};
use crate::modules::smtp::attachment::decode_attachment;
use crate::modules::smtp::config::SmtpConfig;
use crate::modules::smtp::request::EmailDraft;
use crate::modules::smtp::util::generate_message_id;
use crate::modules::utils::email_domain;
use crate::raise_error;

/// Sender and recipients handed to the SMTP server (`MAIL FROM` / `RCPT TO`),
/// independent of the addresses written into the message headers.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct MailEnvelope {
    pub from: String,
    pub recipients: Vec<String>,
}

/// A fully encoded message ready for transmission.
#[derive(Clone, Debug)]
pub struct OutgoingEmail {
    pub message_id: String,
    pub envelope: MailEnvelope,
    pub body: Vec<u8>,
}

impl OutgoingEmail {
    pub fn to_message(&self) -> Message<'_> {
        let mut message = Message::empty()
            .from(self.envelope.from.clone())
            .body(self.body.as_slice());
        for recipient in &self.envelope.recipients {
            message = message.to(recipient.clone());
        }
        message
    }
}

/// Picks the sender address, enforcing the allowed domain on overrides.
pub fn resolve_sender(from_email: Option<&str>, config: &SmtpConfig) -> RelayResult<String> {
    let Some(from_email) = from_email else {
        return Ok(config.default_sender.clone());
    };

    if let Some(allowed) = &config.allowed_from_domain {
        let permitted = email_domain(from_email)
            .map(|domain| domain.eq_ignore_ascii_case(allowed))
            .unwrap_or(false);
        if !permitted {
            return Err(raise_error!(
                "from_email not allowed for this domain".into(),
                ErrorCode::ForbiddenSender
            ));
        }
    }
    Ok(from_email.to_string())
}

fn to_address(addresses: &[String]) -> Address<'static> {
    if addresses.len() == 1 {
        Address::from(addresses[0].clone())
    } else {
        Address::new_list(
            addresses
                .iter()
                .map(|address| Address::from(address.clone()))
                .collect(),
        )
    }
}

impl EmailDraft {
    /// Encodes the draft as a MIME message and derives its envelope.
    ///
    /// The sender domain check runs before any attachment is decoded.
    pub fn compose(&self, config: &SmtpConfig) -> RelayResult<OutgoingEmail> {
        let sender = resolve_sender(self.from_email.as_deref(), config)?;
        let message_id = generate_message_id(&sender);

        let from = Address::new_address(
            self.from_name.clone().map(Cow::Owned),
            Cow::Owned(sender.clone()),
        );

        let mut builder = MessageBuilder::new()
            .from(from)
            .to(to_address(&self.to))
            .subject(self.subject.clone())
            .message_id(message_id.clone());

        if !self.cc.is_empty() {
            builder = builder.cc(to_address(&self.cc));
        }
        if config.bcc_header && !self.bcc.is_empty() {
            builder = builder.bcc(to_address(&self.bcc));
        }

        // Both bodies present: mail-builder nests them as multipart/alternative.
        if let Some(text) = &self.text {
            builder = builder.text_body(text.clone());
        }
        if let Some(html) = &self.html {
            builder = builder.html_body(html.clone());
        }

        for attachment in &self.attachments {
            let decoded = decode_attachment(attachment)?;
            debug!(
                name = %decoded.name,
                content_type = %decoded.content_type,
                size = decoded.content.len(),
                "attaching file"
            );
            builder = builder.attachment(
                decoded.content_type.to_string(),
                decoded.name,
                BodyPart::Binary(Cow::Owned(decoded.content)),
            );
        }

        let body = builder.write_to_vec().map_err(|e| {
            raise_error!(
                format!("Failed to build message: {}", e),
                ErrorCode::InternalError
            )
        })?;

        let recipients = self
            .to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .cloned()
            .collect();

        Ok(OutgoingEmail {
            message_id,
            envelope: MailEnvelope {
                from: sender,
                recipients,
            },
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::settings::cli::Settings;
    use crate::modules::smtp::request::{Attachment, EmailRequest};

    fn config() -> SmtpConfig {
        SmtpConfig::from(&Settings::new_for_test())
    }

    fn draft(request: EmailRequest) -> EmailDraft {
        request.validate().unwrap()
    }

    fn base() -> EmailRequest {
        EmailRequest {
            to: Some(vec!["a@x.com".into(), "b@y.com".into()]),
            subject: Some("Quarterly update".into()),
            text: Some("Plain body".into()),
            ..Default::default()
        }
    }

    fn rendered(email: &OutgoingEmail) -> String {
        String::from_utf8_lossy(&email.body).into_owned()
    }

    #[test]
    fn text_only_message() {
        let email = draft(base()).compose(&config()).unwrap();
        let body = rendered(&email);
        assert!(body.contains("Subject: Quarterly update"));
        assert!(body.contains("text/plain"));
        assert!(!body.contains("multipart"));
        assert!(!body.contains("\r\nCc:"));
        assert_eq!(email.envelope.from, "relay@example.com");
    }

    #[test]
    fn both_bodies_become_alternatives() {
        let request = EmailRequest {
            html: Some("<p>Rich body</p>".into()),
            ..base()
        };
        let body = rendered(&draft(request).compose(&config()).unwrap());
        assert!(body.contains("multipart/alternative"));
        assert!(body.contains("text/plain"));
        assert!(body.contains("text/html"));
        assert!(!body.contains("multipart/mixed"));
    }

    #[test]
    fn html_only_message_is_a_single_part() {
        let request = EmailRequest {
            text: None,
            html: Some("<p>Rich body</p>".into()),
            ..base()
        };
        let body = rendered(&draft(request).compose(&config()).unwrap());
        assert!(body.contains("text/html"));
        assert!(body.contains("<p>Rich body</p>"));
        assert!(!body.contains("multipart"));
        assert!(!body.contains("text/plain"));
    }

    #[test]
    fn bcc_is_envelope_only_by_default() {
        let request = EmailRequest {
            cc: Some(vec!["c@z.com".into()]),
            bcc: Some(vec!["hidden@z.com".into()]),
            ..base()
        };
        let email = draft(request).compose(&config()).unwrap();
        let body = rendered(&email);
        assert!(body.contains("c@z.com"));
        assert!(!body.contains("hidden@z.com"));
        assert_eq!(
            email.envelope.recipients,
            vec!["a@x.com", "b@y.com", "c@z.com", "hidden@z.com"]
        );
    }

    #[test]
    fn bcc_header_when_configured() {
        let mut config = config();
        config.bcc_header = true;
        let request = EmailRequest {
            bcc: Some(vec!["hidden@z.com".into()]),
            ..base()
        };
        let body = rendered(&draft(request).compose(&config).unwrap());
        assert!(body.contains("Bcc:"));
        assert!(body.contains("hidden@z.com"));
    }

    #[test]
    fn sender_display_name_and_override() {
        let request = EmailRequest {
            from_email: Some("jane@example.com".into()),
            from_name: Some(" Jane Doe ".into()),
            ..base()
        };
        let email = draft(request).compose(&config()).unwrap();
        let body = rendered(&email);
        assert!(body.contains("Jane Doe"));
        assert!(body.contains("<jane@example.com>"));
        assert_eq!(email.envelope.from, "jane@example.com");
        assert!(email.message_id.ends_with("@example.com"));
    }

    #[test]
    fn forbidden_sender_domain() {
        let mut config = config();
        config.allowed_from_domain = Some("example.com".into());
        let request = EmailRequest {
            from_email: Some("x@other.com".into()),
            ..base()
        };
        let err = draft(request).compose(&config).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ForbiddenSender);
    }

    #[test]
    fn allowed_sender_domain_is_case_insensitive() {
        let mut config = config();
        config.allowed_from_domain = Some("example.com".into());
        assert_eq!(
            resolve_sender(Some("Boss@EXAMPLE.com"), &config).unwrap(),
            "Boss@EXAMPLE.com"
        );
        // The guard only applies to overrides.
        assert_eq!(resolve_sender(None, &config).unwrap(), "relay@example.com");
        // A look-alike suffix is not the same domain.
        assert!(resolve_sender(Some("x@notexample.com"), &config).is_err());
    }

    #[test]
    fn sender_check_precedes_attachment_decoding() {
        let mut config = config();
        config.allowed_from_domain = Some("example.com".into());
        let request = EmailRequest {
            from_email: Some("x@other.com".into()),
            attachments: Some(vec![Attachment {
                name: Some("bad.bin".into()),
                mime_type: None,
                data: Some("%%%".into()),
            }]),
            ..base()
        };
        let err = draft(request).compose(&config).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ForbiddenSender);
    }

    #[test]
    fn attachments_are_named_binary_parts() {
        let request = EmailRequest {
            html: Some("<p>see file</p>".into()),
            attachments: Some(vec![Attachment {
                name: Some("pic.png".into()),
                mime_type: Some("application/octet-stream".into()),
                data: Some("data:image/png;base64,iVBORw0KGgo=".into()),
            }]),
            ..base()
        };
        let body = rendered(&draft(request).compose(&config()).unwrap());
        assert!(body.contains("multipart/mixed"));
        assert!(body.contains("multipart/alternative"));
        assert!(body.contains("image/png"));
        assert!(body.contains("pic.png"));
    }

    #[test]
    fn undecodable_attachment_is_rejected() {
        let request = EmailRequest {
            attachments: Some(vec![Attachment {
                name: Some("broken.txt".into()),
                mime_type: Some("text/plain".into()),
                data: Some("data:text/plain;base64,@@@".into()),
            }]),
            ..base()
        };
        let err = draft(request).compose(&config()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAttachment);
        assert!(err.to_string().contains("'broken.txt'"));
    }
}
