// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{
    builder::{BoolishValueParser, ValueParser},
    ArgAction, Parser,
};
use std::{collections::HashSet, path::PathBuf};

pub const DEFAULT_SENDER: &str = "no-reply@example.com";

#[derive(Debug, Clone, Parser)]
#[clap(
    name = "draftmailer",
    about = "A small HTTP API that relays structured email drafts through SMTP or turns them into Gmail compose links.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// SMTP server hostname (default: "localhost")
    #[clap(
        long,
        env = "SMTP_HOST",
        default_value = "localhost",
        help = "Set the SMTP server hostname"
    )]
    pub smtp_host: String,

    /// SMTP server port (default: 587)
    #[clap(
        long,
        env = "SMTP_PORT",
        default_value = "587",
        help = "Set the SMTP server port"
    )]
    pub smtp_port: u16,

    #[clap(long, env = "SMTP_USER", help = "Set the SMTP username")]
    pub smtp_user: Option<String>,

    #[clap(
        long,
        env = "SMTP_PASS",
        hide_env_values = true,
        help = "Set the SMTP password"
    )]
    pub smtp_pass: Option<String>,

    /// Default sender address. Falls back to the SMTP username, then to `no-reply@example.com`.
    #[clap(long, env = "SMTP_FROM", help = "Set the default sender address")]
    pub smtp_from: Option<String>,

    /// Use an encrypted transport: implicit TLS on port 465, STARTTLS elsewhere.
    #[clap(
        long,
        env = "SMTP_SECURE",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Encrypt the SMTP connection (implicit TLS on port 465, STARTTLS otherwise)"
    )]
    pub smtp_secure: bool,

    #[clap(
        long,
        env = "SMTP_TIMEOUT_SECS",
        default_value = "30",
        help = "Set the SMTP connect and command timeout in seconds",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub smtp_timeout_secs: u64,

    /// Write a visible `Bcc` header into sent messages. Bcc addresses are always
    /// envelope recipients; by default they are kept out of the headers.
    #[clap(
        long,
        env = "SMTP_BCC_HEADER",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Write Bcc recipients into a visible Bcc header"
    )]
    pub smtp_bcc_header: bool,

    #[clap(
        long,
        env = "ALLOWED_FROM_DOMAIN",
        help = "Only accept overriding sender addresses from this domain (e.g., example.com)",
        value_parser = ValueParser::new(|s: &str| -> Result<String, String> {
            let domain = s.trim().trim_start_matches('@').to_string();
            if domain.is_empty() {
                return Err("The allowed sender domain cannot be empty.".to_string());
            }
            Ok(domain)
        })
    )]
    pub allowed_from_domain: Option<String>,

    /// CORS allowed origins (default: "http://localhost:8080")
    #[clap(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "http://localhost:8080",
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub allowed_origins: HashSet<String>,

    #[clap(
        long,
        env = "DRAFTMAILER_CORS_MAX_AGE",
        default_value = "86400",
        help = "Set the CORS max age in seconds"
    )]
    pub draftmailer_cors_max_age: i32,

    #[clap(
        long,
        env = "DRAFTMAILER_BIND_IP",
        default_value = "0.0.0.0",
        help = "The IPv4 address the HTTP server binds to",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub draftmailer_bind_ip: String,

    /// HTTP port (default: 8000)
    #[clap(
        long,
        env = "DRAFTMAILER_HTTP_PORT",
        default_value = "8000",
        help = "Set the HTTP port for draftmailer"
    )]
    pub draftmailer_http_port: u16,

    #[clap(
        long,
        env = "DRAFTMAILER_HTTP_COMPRESSION_ENABLED",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Compress HTTP responses"
    )]
    pub draftmailer_http_compression_enabled: bool,

    /// Log level (default: "info")
    #[clap(
        long,
        env = "DRAFTMAILER_LOG_LEVEL",
        default_value = "info",
        help = "Set the log level for draftmailer"
    )]
    pub draftmailer_log_level: String,

    #[clap(
        long,
        env = "DRAFTMAILER_ANSI_LOGS",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Enable ANSI formatted logs"
    )]
    pub draftmailer_ansi_logs: bool,

    #[clap(
        long,
        env = "DRAFTMAILER_JSON_LOGS",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Enable JSON formatted logs"
    )]
    pub draftmailer_json_logs: bool,

    /// If false, logs will be printed to stdout
    #[clap(
        long,
        env = "DRAFTMAILER_LOG_TO_FILE",
        default_value = "false",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub draftmailer_log_to_file: bool,

    #[clap(
        long,
        env = "DRAFTMAILER_LOG_DIR",
        default_value = "logs",
        help = "Directory for rolling log files"
    )]
    pub draftmailer_log_dir: PathBuf,

    #[clap(
        long,
        env = "DRAFTMAILER_MAX_LOG_FILES",
        default_value = "5",
        help = "Set the maximum number of server log files"
    )]
    pub draftmailer_max_log_files: usize,
}

impl Settings {
    /// Loads `.env` (when present) and parses the command line and environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Settings::parse()
    }

    pub fn default_sender(&self) -> String {
        self.smtp_from
            .clone()
            .or_else(|| self.smtp_user.clone())
            .filter(|sender| !sender.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER.to_string())
    }

    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Settings {
            smtp_host: "127.0.0.1".into(),
            // Nothing listens on port 1, so any accidental delivery attempt fails fast.
            smtp_port: 1,
            smtp_user: None,
            smtp_pass: None,
            smtp_from: Some("relay@example.com".into()),
            smtp_secure: false,
            smtp_timeout_secs: 5,
            smtp_bcc_header: false,
            allowed_from_domain: None,
            allowed_origins: ["http://localhost:8080".to_string()].into_iter().collect(),
            draftmailer_cors_max_age: 86400,
            draftmailer_bind_ip: "127.0.0.1".into(),
            draftmailer_http_port: 8000,
            draftmailer_http_compression_enabled: false,
            draftmailer_log_level: "info".into(),
            draftmailer_ansi_logs: false,
            draftmailer_json_logs: false,
            draftmailer_log_to_file: false,
            draftmailer_log_dir: PathBuf::from("logs"),
            draftmailer_max_log_files: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults_from_arguments() {
        let settings = Settings::try_parse_from([
            "draftmailer",
            "--smtp-host",
            "mail.example.com",
            "--smtp-secure",
            "no",
            "--allowed-origins",
            "https://a.example.com, ,https://b.example.com",
        ])
        .unwrap();

        assert_eq!(settings.smtp_host, "mail.example.com");
        assert!(!settings.smtp_secure);
        assert_eq!(settings.allowed_origins.len(), 2);
        assert!(settings.allowed_origins.contains("https://b.example.com"));
    }

    #[test]
    fn normalizes_allowed_domain() {
        let settings = Settings::try_parse_from([
            "draftmailer",
            "--allowed-from-domain",
            " @example.com ",
        ])
        .unwrap();
        assert_eq!(settings.allowed_from_domain.as_deref(), Some("example.com"));

        let rejected =
            Settings::try_parse_from(["draftmailer", "--allowed-from-domain", "  "]);
        assert!(rejected.is_err());
    }

    #[test]
    fn default_sender_fallback_order() {
        let mut settings = Settings::new_for_test();
        assert_eq!(settings.default_sender(), "relay@example.com");

        settings.smtp_from = None;
        settings.smtp_user = Some("user@example.com".into());
        assert_eq!(settings.default_sender(), "user@example.com");

        settings.smtp_user = None;
        assert_eq!(settings.default_sender(), DEFAULT_SENDER);
    }
}
