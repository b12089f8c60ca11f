//! Tracing setup.
//!
//! The TUI owns the terminal, so it logs to a file; headless commands log
//! to stderr and keep stdout for their output.

use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name inside the configured log directory.
pub const LOG_FILE_NAME: &str = "tldrchat.log";

/// File log filter when `RUST_LOG` is unset.
const FILE_DEFAULT_FILTER: &str = "info,tldrchat=debug";

/// Stderr filter when `RUST_LOG` is unset; `ask` prints the reply to the
/// same terminal.
const STDERR_DEFAULT_FILTER: &str = "warn";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log warnings to stderr, compact, with color codes only on a terminal.
pub fn init_stderr() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter(STDERR_DEFAULT_FILTER))
        .with(stderr_layer)
        .try_init();
}

/// Log to `<log_dir>/tldrchat.log`.
///
/// The returned guard flushes pending lines on drop; keep it alive for as
/// long as the TUI runs.
pub fn init_file(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter(FILE_DEFAULT_FILTER))
        .with(file_layer)
        .try_init();

    tracing::debug!(dir = %log_dir.display(), "file logging initialized");
    Ok(guard)
}
