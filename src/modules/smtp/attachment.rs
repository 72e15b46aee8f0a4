// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::modules::error::{code::ErrorCode, RelayResult};
use crate::modules::smtp::request::Attachment;
use crate::{base64_decode_standard, raise_error};

pub const DATA_URL_SCHEME: &str = "data:";
pub const DEFAULT_MAINTYPE: &str = "application";
pub const DEFAULT_SUBTYPE: &str = "octet-stream";

/// A `maintype/subtype` pair, without parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub maintype: String,
    pub subtype: String,
}

impl ContentType {
    pub fn octet_stream() -> Self {
        Self {
            maintype: DEFAULT_MAINTYPE.into(),
            subtype: DEFAULT_SUBTYPE.into(),
        }
    }

    /// Picks the first usable media type, in order: the one carried by the data URL,
    /// the declared one, then `application/octet-stream`.
    pub fn resolve(from_data_url: Option<&str>, declared: Option<&str>) -> Self {
        [from_data_url, declared]
            .into_iter()
            .flatten()
            .find_map(Self::parse)
            .unwrap_or_else(Self::octet_stream)
    }

    /// Parses `type/subtype[;params]`. Blank input yields `None`; a value without a
    /// `/` keeps its main type and gets the `octet-stream` subtype. Either part holding
    /// anything outside the RFC 2045 token set also yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let mut parts = essence.split('/');
        let maintype = parts.next().unwrap_or_default().trim();
        if maintype.is_empty() {
            return None;
        }
        let subtype = parts
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SUBTYPE);
        if parts.next().is_some() || !is_token(maintype) || !is_token(subtype) {
            return None;
        }

        Some(Self {
            maintype: maintype.to_string(),
            subtype: subtype.to_string(),
        })
    }
}

fn is_token(value: &str) -> bool {
    value.bytes().all(|b| {
        b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?=".contains(&b)
    })
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.maintype, self.subtype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAttachment {
    pub name: String,
    pub content_type: ContentType,
    pub content: Vec<u8>,
}

/// Splits `data` into the media type found in a data URL header (if any) and the
/// base64 payload.
fn split_data(data: &str) -> Result<(Option<&str>, &str), String> {
    match data.strip_prefix(DATA_URL_SCHEME) {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| "data URL has no ',' before its payload".to_string())?;
            let media_type = header.split(';').next().unwrap_or_default();
            Ok((Some(media_type), payload))
        }
        None => Ok((None, data)),
    }
}

pub fn decode_attachment(attachment: &Attachment) -> RelayResult<DecodedAttachment> {
    let name = attachment.name.clone().unwrap_or_default();
    let invalid = |reason: String| {
        raise_error!(
            format!("Failed to process attachment '{}': {}", name, reason),
            ErrorCode::InvalidAttachment
        )
    };

    let data = attachment.data.as_deref().unwrap_or_default();
    let (media_type, payload) = split_data(data).map_err(&invalid)?;

    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let content = base64_decode_standard!(payload.as_bytes()).map_err(|e| invalid(e.to_string()))?;

    Ok(DecodedAttachment {
        content_type: ContentType::resolve(media_type, attachment.mime_type.as_deref()),
        name,
        content,
    })
}
