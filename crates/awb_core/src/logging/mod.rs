//! Logging bootstrap.
//!
//! Application-wide diagnostics go through the `tracing` ecosystem; this
//! module owns the one-time subscriber setup. When a logs directory is
//! given, output also goes to a daily-rolling file there.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity floor when `RUST_LOG` is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Initialize the global tracing subscriber.
///
/// Respects `RUST_LOG`, falling back to the given default level. Writes
/// to stderr with timestamps, plus a daily-rolling `awb.log` in
/// `logs_dir` when one is given (the directory must already exist).
/// Call once at startup; the returned guard must stay alive for file
/// output to flush.
pub fn init_tracing(default_level: LogLevel, logs_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    let stderr_layer = fmt::layer().with_target(true).with_thread_ids(false);
    let registry = tracing_subscriber::registry().with(stderr_layer).with(filter);

    match logs_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling_appender(dir));
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Daily-rolling `awb.log` appender inside the logs directory.
fn rolling_appender(dir: &Path) -> RollingFileAppender {
    tracing_appender::rolling::daily(dir, "awb.log")
}

fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(level_to_filter_str(LogLevel::Debug), "debug");
        assert_eq!(level_to_filter_str(LogLevel::Error), "error");
    }

    #[test]
    fn rolling_appender_writes_into_logs_dir() {
        let dir = tempdir().unwrap();
        let mut appender = rolling_appender(dir.path());
        writeln!(appender, "batch started").unwrap();
        appender.flush().unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].file_name().to_string_lossy().into_owned();
        assert!(name.starts_with("awb.log"));
    }
}
