use crate::config::LoggingConfig;
use std::env;
use std::path::Path;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. Stdout carries the plugin status line,
/// so terminal logs go to stderr.
///
/// The returned guard flushes the file writer and must outlive the run.
pub fn init_logger(config: &LoggingConfig) -> Option<WorkerGuard> {
    // `TRACING_LEVEL` wins over the configured level; default to `warn`.
    let filter = env::var("TRACING_LEVEL")
        .ok()
        .or_else(|| config.level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let filter_layer = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_file_path = env::var("LOG_FILE_PATH").ok().or_else(|| config.file.clone());

    let (file_layer, guard) = match log_file_path {
        Some(path) => {
            let path = Path::new(&path);
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| "check-maxvalue.log".as_ref());

            let file_appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_thread_names(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_thread_names(true)
                .without_time()
                .with_ansi(false),
        )
        .with(file_layer)
        .with(filter_layer)
        .init();

    debug!("Tracing is configured (filter: {})", filter);

    guard
}
