use crate::constants::ENV_LOG_DIR;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging on stderr, plus a daily-rotated JSON log file
/// when `TRIP_CONTACTS_LOG_DIR` is set.
///
/// Keep the returned guard alive until exit so the file log is flushed.
pub fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    // Respect RUST_LOG if set; otherwise keep the console quiet unless asked
    let default_filter = if verbose {
        "trip_contacts=debug,info"
    } else {
        "trip_contacts=info,warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stdout carries the run summary, so logs go to stderr
    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.trim().is_empty() => {
            let _ = fs::create_dir_all(&dir);
            let file_appender = tracing_appender::rolling::daily(&dir, "trip_contacts.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}
