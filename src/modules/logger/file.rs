use crate::modules::error::code::ErrorCode;
use crate::modules::error::RelayResult;
use crate::modules::logger::LocalTimer;
use crate::modules::settings::cli::Settings;
use crate::raise_error;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

pub static LOG_WORKER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn setup_file_logger(settings: &Settings, level: Level) -> RelayResult<()> {
    let (writer, guard) = server_log_writer(settings)?;
    // The guard flushes buffered lines on drop and must live as long as the process.
    let _ = LOG_WORKER_GUARD.set(guard);

    let layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_ansi(settings.draftmailer_ansi_logs)
        .with_level(true)
        .with_writer(writer)
        .with_target(true);
    let layer = if settings.draftmailer_json_logs {
        layer.json().boxed()
    } else {
        layer.boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::from_level(level))
        .with(layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| raise_error!(format!("{}", e), ErrorCode::InternalError))
}

fn server_log_writer(settings: &Settings) -> RelayResult<(NonBlocking, WorkerGuard)> {
    let rolling = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("draftmailer")
        .max_log_files(settings.draftmailer_max_log_files)
        .build(&settings.draftmailer_log_dir)
        .map_err(|e| {
            raise_error!(
                format!(
                    "failed to initialize rolling file appender in {}: {}",
                    settings.draftmailer_log_dir.display(),
                    e
                ),
                ErrorCode::InternalError
            )
        })?;
    Ok(tracing_appender::non_blocking(rolling))
}
