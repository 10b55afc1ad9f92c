//! Logging utilities for frqviz.
//!
//! Structured logging helpers shared by the renderers, the loaders and the
//! command-line entry point.

use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Initialize the tracing subscriber with the given log level
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    // try_init so that library users who already installed a subscriber keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Log the shape of a dataset after it has been loaded
pub fn log_dataset_stats(source: &str, rows: usize, columns: &[String], index: &[String]) {
    info!(
        operation = "dataset_load",
        source = source,
        rows = rows,
        column_count = columns.len(),
        columns = %columns.join(", "),
        index = %index.join(", "),
        "Dataset loaded successfully"
    );
}

/// Log an error with context
pub fn log_error(error: &crate::error::FrqvizError, context: &str) {
    error!(
        error = %error,
        context = context,
        "Error occurred"
    );
}

/// Generate a unique id used to correlate the log lines of one render
pub fn generate_render_id() -> String {
    Uuid::new_v4().to_string()
}
