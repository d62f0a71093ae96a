//! Logging and observability
//!
//! Structured logging via `tracing`, with console output and an optional JSON
//! rolling file. The macros below give the pipeline stages a consistent set of
//! field names.
//!
//! ```no_run
//! use opsync::logging::init_logging;
//! use opsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! tracing::info!("opsync started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a sync run
///
/// ```no_run
/// use opsync::log_sync_start;
///
/// log_sync_start!("2024-05-13 00:00:01", "2024-05-14 09:30:00", false);
/// ```
#[macro_export]
macro_rules! log_sync_start {
    ($start:expr, $end:expr, $dry_run:expr) => {
        tracing::info!(
            window_start = %$start,
            window_end = %$end,
            dry_run = $dry_run,
            "Starting sync"
        );
    };
}

/// Log the completion of a pipeline stage with its duration
///
/// ```no_run
/// use opsync::log_stage_complete;
/// use std::time::Instant;
///
/// let started = Instant::now();
/// log_stage_complete!("fetch", started.elapsed(), records = 12usize);
/// ```
#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $duration:expr $(, $field:ident = $value:expr)* $(,)?) => {
        tracing::info!(
            stage = $stage,
            duration_ms = $duration.as_millis() as u64,
            $($field = $value,)*
            "Stage completed"
        );
    };
}

/// Log an error with context
///
/// ```no_run
/// use opsync::log_error_with_context;
/// use opsync::domain::OpsyncError;
///
/// let error = OpsyncError::Database("connection refused".to_string());
/// log_error_with_context!(&error, "Failed to read cursor");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// ```no_run
/// use opsync::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
