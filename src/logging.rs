//! Logging configuration using the tracing framework
//!
//! Logs are filtered through the RUST_LOG environment variable.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "planner=info,warn";

/// Initialize console logging
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log level (e.g., "debug", "info", "warn", "error")
///   - Default: "planner=info,warn"
///   - Examples:
///     - `RUST_LOG=planner=debug` - Debug logs for the planner crate
///     - `RUST_LOG=planner::api=trace` - Trace every backend request
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();
}

/// Initialize logging to a daily rolling file only
///
/// The interactive UI owns the terminal, so nothing may be written to
/// stdout or stderr while it runs.
///
/// # Examples
///
/// ```no_run
/// use planner::logging;
///
/// logging::init_with_file("planner.log").expect("Failed to initialize logging");
/// ```
pub fn init_with_file(log_file_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};

    let log_dir =
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "pmo", "planner") {
            let log_path = proj_dirs.data_dir().join("logs");
            std::fs::create_dir_all(&log_path)?;
            log_path
        } else {
            std::env::current_dir()?
        };

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_file_name);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .try_init()?;

    Ok(())
}

/// Initialize logging for tests (errors only unless RUST_LOG says otherwise)
pub fn init_test() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_test_writer())
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
    }

    #[test]
    fn test_structured_logging() {
        init_test();
        tracing::info!(project_id = 7, weeks = 36, "Structured log message");
    }
}
