//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the admin dashboard.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::{AdminError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop, so the caller keeps it
/// alive for as long as the process runs.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| AdminError::Config(format!("Invalid log filter '{}': {}", config.level, e)))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "mlm-admin.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AdminError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log operator actions with structured data
pub fn log_operator_action(screen: &str, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        screen = screen,
        action = action,
        target = target,
        details = details,
        "Operator action performed"
    );
}

/// Log outgoing API requests
pub fn log_api_request(method: &str, path: &str, authorized: bool) {
    debug!(
        method = method,
        path = path,
        authorized = authorized,
        "API request"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log realtime relay events
pub fn log_realtime_event(event: &str, details: Option<&str>) {
    info!(
        event = event,
        details = details,
        "Realtime event"
    );
}
