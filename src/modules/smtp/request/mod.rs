// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{FieldError, RelayResult};
use crate::{raise_validation_error, validate_email};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

pub mod builder;

/// A file to attach to an outgoing message.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct Attachment {
    /// File name shown to the recipient (e.g. "report.pdf").
    pub name: Option<String>,
    /// Declared MIME type (e.g. "application/pdf"). Used when `data` is not a data URL
    /// or its data URL carries no media type.
    #[oai(rename = "type")]
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    /// Either a data URL (`data:image/png;base64,...`) or a bare base64 payload.
    pub data: Option<String>,
}

/// Body of `POST /api/send-email`.
///
/// Every field is optional at the schema level so that a request with several
/// problems is rejected once, with every problem listed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct EmailRequest {
    /// Primary recipients. At least one is required.
    pub to: Option<Vec<String>>,
    /// Carbon copy recipients.
    pub cc: Option<Vec<String>>,
    /// Blind carbon copy recipients. They receive the message but are not listed in
    /// its headers unless the relay is configured otherwise.
    pub bcc: Option<Vec<String>>,
    /// Subject line. Required and non-empty.
    pub subject: Option<String>,
    /// Plain text body. At least one of `text` and `html` must have content.
    pub text: Option<String>,
    /// HTML body. Sent as an alternative to `text` when both are present.
    pub html: Option<String>,
    /// Overrides the configured sender address. May be restricted to one domain.
    pub from_email: Option<String>,
    /// Display name for the sender.
    pub from_name: Option<String>,
    /// Files to attach, in order.
    pub attachments: Option<Vec<Attachment>>,
}

/// An [`EmailRequest`] that passed validation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmailDraft {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
    pub attachments: Vec<Attachment>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_addresses(field: &str, addresses: Vec<String>, errors: &mut Vec<FieldError>) -> Vec<String> {
    addresses
        .into_iter()
        .enumerate()
        .filter_map(|(index, address)| {
            let address = address.trim().to_string();
            match validate_email!(&address) {
                Ok(()) => Some(address),
                Err(_) => {
                    errors.push(FieldError::new(
                        format!("{}[{}]", field, index),
                        format!("Not a valid email address: '{}'", address),
                    ));
                    None
                }
            }
        })
        .collect()
}

impl EmailRequest {
    /// Checks every field and returns all violations together.
    pub fn validate(self) -> RelayResult<EmailDraft> {
        let mut errors = Vec::new();

        let to = self.to.unwrap_or_default();
        if to.is_empty() {
            errors.push(FieldError::new("to", "At least one recipient is required"));
        }
        let to = check_addresses("to", to, &mut errors);
        let cc = check_addresses("cc", self.cc.unwrap_or_default(), &mut errors);
        let bcc = check_addresses("bcc", self.bcc.unwrap_or_default(), &mut errors);

        let subject = self.subject.unwrap_or_default();
        if subject.trim().is_empty() {
            errors.push(FieldError::new("subject", "Subject cannot be empty"));
        } else if subject.contains(['\r', '\n']) {
            errors.push(FieldError::new(
                "subject",
                "Subject cannot contain line breaks",
            ));
        }

        let text = non_blank(self.text);
        let html = non_blank(self.html);
        if text.is_none() && html.is_none() {
            errors.push(FieldError::new(
                "body",
                "Either 'text' or 'html' content is required.",
            ));
        }

        let from_email = non_blank(self.from_email).map(|email| email.trim().to_string());
        if let Some(email) = &from_email {
            if validate_email!(email).is_err() {
                errors.push(FieldError::new(
                    "from_email",
                    format!("Not a valid email address: '{}'", email),
                ));
            }
        }
        let from_name = non_blank(self.from_name).map(|name| name.trim().to_string());

        let attachments = self.attachments.unwrap_or_default();
        for (index, attachment) in attachments.iter().enumerate() {
            if attachment.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                errors.push(FieldError::new(
                    format!("attachments[{}].name", index),
                    "Attachment name is required",
                ));
            }
            if attachment.data.is_none() {
                errors.push(FieldError::new(
                    format!("attachments[{}].data", index),
                    "Attachment data is required",
                ));
            }
        }

        if !errors.is_empty() {
            return Err(raise_validation_error!(errors));
        }

        Ok(EmailDraft {
            to,
            cc,
            bcc,
            subject,
            text,
            html,
            from_email,
            from_name,
            attachments,
        })
    }
}

#[cfg(test)]
mod tests;
