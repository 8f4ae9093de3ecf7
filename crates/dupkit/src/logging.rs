//! File-based tracing setup. The terminal belongs to the TUI, so nothing
//! is ever logged to stdout.

use std::env;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing into `<log_dir>/dupkit.log`. The returned guard must
/// stay alive for the duration of the program so buffered lines get
/// flushed. Filter via `DUPKIT_LOG` (default `info`).
pub fn init(log_dir: &Path) -> WorkerGuard {
    let filter = env::var("DUPKIT_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_layer = EnvFilter::new(filter);

    let file_appender = tracing_appender::rolling::never(log_dir, "dupkit.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter_layer)
        .init();

    guard
}
