// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use super::{Attachment, EmailRequest};
use crate::modules::error::{FieldError, RelayError};

fn valid_request() -> EmailRequest {
    EmailRequest {
        to: Some(vec!["a@x.com".into()]),
        subject: Some("Hello".into()),
        text: Some("Hi there".into()),
        ..Default::default()
    }
}

fn field_errors(request: EmailRequest) -> Vec<FieldError> {
    match request.validate().unwrap_err() {
        RelayError::Validation { errors, .. } => errors,
        other => panic!("expected validation error, got {other:?}"),
    }
}

fn fields(errors: &[FieldError]) -> Vec<&str> {
    errors.iter().map(|e| e.field.as_str()).collect()
}

#[test]
fn accepts_minimal_request() {
    let draft = valid_request().validate().unwrap();
    assert_eq!(draft.to, vec!["a@x.com"]);
    assert_eq!(draft.subject, "Hello");
    assert_eq!(draft.text.as_deref(), Some("Hi there"));
    assert!(draft.html.is_none());
    assert!(draft.cc.is_empty() && draft.bcc.is_empty());
}

#[test]
fn rejects_missing_bodies() {
    for (text, html) in [
        (None, None),
        (Some(""), None),
        (Some("   "), Some("\n\t")),
    ] {
        let request = EmailRequest {
            text: text.map(Into::into),
            html: html.map(Into::into),
            ..valid_request()
        };
        assert_eq!(fields(&field_errors(request)), vec!["body"]);
    }
}

#[test]
fn html_alone_is_enough() {
    let request = EmailRequest {
        text: None,
        html: Some("<p>Hi</p>".into()),
        ..valid_request()
    };
    let draft = request.validate().unwrap();
    assert_eq!(draft.html.as_deref(), Some("<p>Hi</p>"));
}

#[test]
fn rejects_line_breaks_in_subject() {
    for subject in ["Hi\r\nBcc: evil@x.com", "Hi\nthere", "Hi\r"] {
        let request = EmailRequest {
            subject: Some(subject.into()),
            ..valid_request()
        };
        let errors = field_errors(request);
        assert_eq!(fields(&errors), vec!["subject"]);
        assert!(errors[0].message.contains("line breaks"));
    }
}

#[test]
fn reports_every_violation_at_once() {
    let request = EmailRequest {
        to: None,
        cc: Some(vec!["ok@x.com".into(), "nope".into()]),
        subject: Some("".into()),
        text: None,
        from_email: Some("also wrong".into()),
        attachments: Some(vec![Attachment::default()]),
        ..Default::default()
    };
    let errors = field_errors(request);
    assert_eq!(
        fields(&errors),
        vec![
            "to",
            "cc[1]",
            "subject",
            "body",
            "from_email",
            "attachments[0].name",
            "attachments[0].data",
        ]
    );
}

#[test]
fn trims_addresses_and_sender_name() {
    let request = EmailRequest {
        to: Some(vec!["  a@x.com ".into()]),
        from_email: Some(" me@x.com ".into()),
        from_name: Some("   ".into()),
        ..valid_request()
    };
    let draft = request.validate().unwrap();
    assert_eq!(draft.to, vec!["a@x.com"]);
    assert_eq!(draft.from_email.as_deref(), Some("me@x.com"));
    assert!(draft.from_name.is_none());
}

#[test]
fn attachment_type_is_read_from_type_key() {
    let request: EmailRequest = serde_json::from_value(serde_json::json!({
        "to": ["a@x.com"],
        "subject": "Files",
        "text": "see attached",
        "attachments": [{"name": "a.txt", "type": "text/plain", "data": "aGk="}]
    }))
    .unwrap();
    let draft = request.validate().unwrap();
    assert_eq!(draft.attachments[0].mime_type.as_deref(), Some("text/plain"));
}
