// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem_openapi::Object;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::modules::compose::html::html_to_text;
use crate::modules::compose::recipients::split_recipients;
use crate::modules::error::{FieldError, RelayResult};
use crate::modules::smtp::request::Attachment;
use crate::raise_validation_error;

pub const GMAIL_COMPOSE_PREFIX: &str = "https://mail.google.com/mail/?view=cm&fs=1&";
const UNNAMED_ATTACHMENT: &str = "attachment";

/// Body of `POST /api/gmail-compose-url`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct GmailComposeRequest {
    /// Recipients separated by `,` or `;`.
    pub to: Option<String>,
    /// Carbon copy recipients separated by `,` or `;`.
    pub cc: Option<String>,
    /// Blind carbon copy recipients separated by `,` or `;`.
    pub bcc: Option<String>,
    pub subject: Option<String>,
    /// HTML body. Converted to plain text for the link.
    pub body: Option<String>,
    /// Gmail links cannot carry files. Their names are listed in the body instead.
    pub attachments: Option<Vec<Attachment>>,
}

impl GmailComposeRequest {
    pub fn is_empty(&self) -> bool {
        self.to.is_none()
            && self.cc.is_none()
            && self.bcc.is_none()
            && self.subject.is_none()
            && self.body.is_none()
            && self.attachments.is_none()
    }

    fn attachment_note(&self) -> Option<String> {
        let attachments = self.attachments.as_ref().filter(|a| !a.is_empty())?;
        let names: Vec<&str> = attachments
            .iter()
            .map(|a| {
                a.name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or(UNNAMED_ATTACHMENT)
            })
            .collect();
        Some(format!(
            "[Attachments not included: {}. Please attach them manually in Gmail.]",
            names.join(", ")
        ))
    }

    fn plain_body(&self) -> String {
        let text = html_to_text(self.body.as_deref().unwrap_or_default());
        match self.attachment_note() {
            Some(note) if text.is_empty() => note,
            Some(note) => format!("{}\n\n{}", text, note),
            None => text,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, Object)]
pub struct GmailComposeResponse {
    pub url: String,
}

/// Builds a Gmail web-compose deep link. Parameters are emitted only when non-empty,
/// in the order `to`, `cc`, `bcc`, `su`, `body`.
pub fn build_gmail_compose_url(request: &GmailComposeRequest) -> RelayResult<String> {
    if request.is_empty() {
        return Err(raise_validation_error!(vec![FieldError::new(
            "body",
            "At least one of to, cc, bcc, subject, body or attachments must be provided"
        )]));
    }

    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in [("to", &request.to), ("cc", &request.cc), ("bcc", &request.bcc)] {
        let recipients = split_recipients(value.as_deref());
        if !recipients.is_empty() {
            query.append_pair(key, &recipients.join(","));
        }
    }
    if let Some(subject) = request.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        query.append_pair("su", subject);
    }
    let body = request.plain_body();
    if !body.is_empty() {
        query.append_pair("body", &body);
    }

    Ok(format!("{}{}", GMAIL_COMPOSE_PREFIX, query.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::error::code::ErrorCode;

    fn named(name: &str) -> Attachment {
        Attachment {
            name: Some(name.into()),
            mime_type: Some("application/pdf".into()),
            data: Some("JVBERi0=".into()),
        }
    }

    #[test]
    fn recipient_and_subject_only() {
        let url = build_gmail_compose_url(&GmailComposeRequest {
            to: Some("a@x.com".into()),
            subject: Some("Hi".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            url,
            "https://mail.google.com/mail/?view=cm&fs=1&to=a%40x.com&su=Hi"
        );
        assert!(!url.contains("body="));
    }

    #[test]
    fn parameters_in_fixed_order() {
        let url = build_gmail_compose_url(&GmailComposeRequest {
            body: Some("<p>Hello world</p>".into()),
            subject: Some("Status update".into()),
            bcc: Some("c@z.com".into()),
            cc: Some("b@y.com".into()),
            to: Some("a@x.com; d@x.com".into()),
            attachments: None,
        })
        .unwrap();
        assert_eq!(
            url,
            "https://mail.google.com/mail/?view=cm&fs=1&to=a%40x.com%2Cd%40x.com&cc=b%40y.com&bcc=c%40z.com&su=Status+update&body=Hello+world"
        );
    }

    #[test]
    fn blank_fields_are_omitted() {
        let url = build_gmail_compose_url(&GmailComposeRequest {
            to: Some(" ; ".into()),
            subject: Some("  ".into()),
            body: Some("<br>".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(url, GMAIL_COMPOSE_PREFIX);
    }

    #[test]
    fn attachments_become_a_note() {
        let request = GmailComposeRequest {
            body: Some("See files".into()),
            attachments: Some(vec![named("a.pdf"), named("b.pdf")]),
            ..Default::default()
        };
        assert_eq!(
            request.plain_body(),
            "See files\n\n[Attachments not included: a.pdf, b.pdf. Please attach them manually in Gmail.]"
        );
        let url = build_gmail_compose_url(&request).unwrap();
        assert!(url.contains("body=See+files%0A%0A%5BAttachments+not+included%3A+a.pdf%2C+b.pdf."));
    }

    #[test]
    fn note_alone_when_body_is_empty() {
        let request = GmailComposeRequest {
            attachments: Some(vec![Attachment::default()]),
            ..Default::default()
        };
        assert_eq!(
            request.plain_body(),
            "[Attachments not included: attachment. Please attach them manually in Gmail.]"
        );
    }

    #[test]
    fn empty_attachment_list_adds_nothing() {
        let request = GmailComposeRequest {
            body: Some("x".into()),
            attachments: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(request.plain_body(), "x");
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = build_gmail_compose_url(&GmailComposeRequest::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}
