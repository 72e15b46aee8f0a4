use crate::modules::error::code::ErrorCode;
use crate::modules::error::RelayResult;
use crate::modules::logger::file::setup_file_logger;
use crate::modules::settings::cli::Settings;
use crate::raise_error;
use chrono::Local;
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, time::FormatTime};

mod file;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

pub fn initialize_logging(settings: &Settings) -> RelayResult<()> {
    let level = parse_log_level(&settings.draftmailer_log_level)?;
    if settings.draftmailer_log_to_file {
        setup_file_logger(settings, level)
    } else {
        setup_stdout_logger(settings, level)
    }
}

fn setup_stdout_logger(settings: &Settings, level: Level) -> RelayResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(settings.draftmailer_ansi_logs)
        .with_writer(std::io::stdout)
        .with_level(true)
        .with_target(true)
        .with_timer(LocalTimer);

    let result = if settings.draftmailer_json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| raise_error!(format!("{}", e), ErrorCode::InternalError))
}

fn parse_log_level(value: &str) -> RelayResult<Level> {
    value.parse::<Level>().map_err(|_| {
        raise_error!(
            format!(
                "Invalid log level '{}'. Use one of: error, warn, info, debug, trace.",
                value
            ),
            ErrorCode::InvalidParameter
        )
    })
}
