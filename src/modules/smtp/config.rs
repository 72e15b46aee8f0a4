// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::time::Duration;

use poem_openapi::Enum;
use serde::{Deserialize, Serialize};

use crate::modules::settings::cli::Settings;

pub const IMPLICIT_TLS_PORT: u16 = 465;

/// How the connection to the SMTP server is secured.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, Enum)]
pub enum TransportMode {
    /// TLS from the first byte.
    ImplicitTls,
    /// Plaintext greeting, upgraded with `STARTTLS`.
    StartTls,
    /// No encryption.
    Plain,
}

impl TransportMode {
    pub fn select(secure: bool, port: u16) -> Self {
        match (secure, port) {
            (true, IMPLICIT_TLS_PORT) => TransportMode::ImplicitTls,
            (true, _) => TransportMode::StartTls,
            (false, _) => TransportMode::Plain,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportMode::ImplicitTls => "implicit-tls",
            TransportMode::StartTls => "starttls",
            TransportMode::Plain => "plain",
        };
        write!(f, "{}", s)
    }
}

/// Relay settings shared by every send. Built once at startup and never mutated.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub default_sender: String,
    pub secure: bool,
    pub allowed_from_domain: Option<String>,
    pub timeout: Duration,
    pub bcc_header: bool,
}

impl SmtpConfig {
    pub fn transport_mode(&self) -> TransportMode {
        TransportMode::select(self.secure, self.port)
    }

    pub fn server(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Username and password, only when both are configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Some((username.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("default_sender", &self.default_sender)
            .field("secure", &self.secure)
            .field("allowed_from_domain", &self.allowed_from_domain)
            .field("timeout", &self.timeout)
            .field("bcc_header", &self.bcc_header)
            .finish()
    }
}

impl From<&Settings> for SmtpConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            host: settings.smtp_host.clone(),
            port: settings.smtp_port,
            username: settings.smtp_user.clone(),
            password: settings.smtp_pass.clone(),
            default_sender: settings.default_sender(),
            secure: settings.smtp_secure,
            allowed_from_domain: settings.allowed_from_domain.clone(),
            timeout: Duration::from_secs(settings.smtp_timeout_secs),
            bcc_header: settings.smtp_bcc_header,
        }
    }
}
