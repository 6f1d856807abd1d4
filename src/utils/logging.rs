//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ChatBuddy application.

use tracing::{info, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{ChatBuddyError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("chatbuddy")
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1) as usize)
        .build(&config.file_path)
        .map_err(|e| ChatBuddyError::Config(format!("Cannot open log file: {}", e)))?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an accepted option selection
pub fn log_selection(session: &str, option_id: &str, stage: &str) {
    info!(
        session = session,
        option_id = option_id,
        stage = stage,
        "Option selected"
    );
}

/// Log a selection that was not part of the offered option set
pub fn log_ignored_selection(session: &str, option_id: &str, reason: &str) {
    debug!(
        session = session,
        option_id = option_id,
        reason = reason,
        "Selection ignored"
    );
}

/// Log an outbound navigation
pub fn log_navigation(session: &str, url: &str) {
    info!(session = session, url = url, "External link opened");
}

/// Log a session reset
pub fn log_session_reset(session: &str, transcript_len: usize) {
    info!(
        session = session,
        transcript_len = transcript_len,
        "Session reset"
    );
}

/// Log host API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log a dropped step from a stale turn
pub fn log_stale_step(session: &str, generation: u64, current: u64) {
    debug!(
        session = session,
        generation = generation,
        current = current,
        "Dropping step from a reset session"
    );
}
