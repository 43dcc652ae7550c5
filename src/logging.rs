// src/logging.rs

use crate::errors::{AskmeError, AskmeResult};
use crate::models::ApiCallLog;
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};
use std::path::PathBuf;

/// Starts the file logger. The terminal belongs to the UI, so nothing is
/// written to stderr. Keep the returned handle alive for the whole run.
pub fn init_logging(level: &str) -> AskmeResult<LoggerHandle> {
    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir()?)
                .basename("askme")
                .suppress_timestamp(),
        )
        .append()
        .format(detailed_format)
        .start()?;

    log::info!("logging initialised at level {}", level);
    Ok(handle)
}

fn log_dir() -> AskmeResult<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| AskmeError::config_error("Could not determine data directory"))?;
    Ok(base.join("askme").join("logs"))
}

/// Logs an API call.
pub fn log_api_call(log: &ApiCallLog) {
    log::info!(
        target: "api",
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    );
}

/// Records a question together with the answer it received.
pub fn log_interaction(question: &str, answer: &str) {
    log::info!(target: "interaction", "Q: {}", question);
    log::info!(target: "interaction", "A: {}", answer);
}
